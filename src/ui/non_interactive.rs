//! Non-interactive UI for CI, `--yes` and piped runs.

use std::collections::HashMap;

use crate::error::{Result, SetupError};

use super::theme::AmplifyTheme;
use super::{
    is_affirmative, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

/// Prefix of environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "AMPLIFY_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `AMPLIFY_PROMPT_<KEY>` variables, then from
/// the prompt's default. A confirmation with neither is answered "no".
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    theme: AmplifyTheme,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();
        Self::with_overrides(mode, env_overrides)
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            theme: AmplifyTheme::plain(),
        }
    }

    /// Answer the prompt `key` with "yes", whatever the environment says.
    pub fn assume_yes(mut self, key: &str) -> Self {
        self.env_overrides.insert(env_key(key), "yes".to_string());
        self
    }
}

fn env_key(prompt_key: &str) -> String {
    format!("{}{}", PROMPT_ENV_PREFIX, prompt_key.to_uppercase())
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let answer = self
            .env_overrides
            .get(&env_key(&prompt.key))
            .or(prompt.default.as_ref());

        match (&prompt.prompt_type, answer) {
            (PromptType::Confirm, answer) => Ok(PromptResult::Bool(
                answer.is_some_and(|a| is_affirmative(a)),
            )),
            (PromptType::Input, Some(value)) => Ok(PromptResult::String(value.clone())),
            (PromptType::Input, None) => Err(SetupError::Other(anyhow::anyhow!(
                "Cannot prompt for '{}' in non-interactive mode (set {})",
                prompt.key,
                env_key(&prompt.key)
            ))),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(PlainSpinner {
            mode: self.mode,
            theme: self.theme.clone(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", self.theme.format_header(title));
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that only prints its final line.
struct PlainSpinner {
    mode: OutputMode,
    theme: AmplifyTheme,
}

impl SpinnerHandle for PlainSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("  {}", self.theme.format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  {}", self.theme.format_error(msg));
    }
}
