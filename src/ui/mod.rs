//! Terminal output and prompts.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI, `--yes` and piped runs
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use amplify_setup::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("NGINX Amplify Agent");
//! ui.success("Installed");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, AmplifyTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key, also used for `AMPLIFY_PROMPT_<KEY>` overrides.
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    pub fn confirm(key: &str, question: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Confirm,
            default: Some(if default { "yes" } else { "no" }.to_string()),
        }
    }

    pub fn input(key: &str, question: &str) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Input,
            default: None,
        }
    }
}

/// The type of prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form text input.
    Input,
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input.
    String(String),
}

impl PromptResult {
    /// Get as string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Get as bool if this is a Bool result.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Whether a textual answer counts as "yes".
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "true" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_result_as_string() {
        assert_eq!(PromptResult::Bool(true).as_string(), "true");
        assert_eq!(PromptResult::String("k".to_string()).as_string(), "k");
    }

    #[test]
    fn prompt_result_as_bool() {
        assert_eq!(PromptResult::Bool(false).as_bool(), Some(false));
        assert_eq!(PromptResult::String("yes".to_string()).as_bool(), None);
    }

    #[test]
    fn confirm_prompt_encodes_default() {
        let prompt = Prompt::confirm("confirm_install", "Continue?", false);
        assert_eq!(prompt.prompt_type, PromptType::Confirm);
        assert_eq!(prompt.default.as_deref(), Some("no"));
    }

    #[test]
    fn input_prompt_has_no_default() {
        let prompt = Prompt::input("api_key", "API key");
        assert_eq!(prompt.prompt_type, PromptType::Input);
        assert_eq!(prompt.default, None);
    }

    #[test]
    fn affirmative_answers() {
        for yes in ["y", "Y", "yes", " YES ", "true", "1"] {
            assert!(is_affirmative(yes), "{yes}");
        }
        for no in ["n", "no", "", "maybe", "0"] {
            assert!(!is_affirmative(no), "{no}");
        }
    }
}
