//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use amplify_setup::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("confirm_install", "yes");
//!
//! let answer = ui.prompt(&Prompt::confirm("confirm_install", "Continue?", false)).unwrap();
//! assert_eq!(answer.as_bool(), Some(true));
//!
//! ui.message("Checking if git exists ... yes");
//! assert!(ui.has_message("git exists"));
//! ```

use std::collections::HashMap;

use crate::error::Result;

use super::{
    is_affirmative, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<String>,
    prompt_responses: HashMap<String, String>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if a message containing `msg` was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        let response = self
            .prompt_responses
            .get(&prompt.key)
            .or(prompt.default.as_ref());

        // Unanswered prompts get a type-appropriate empty value.
        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(response.is_some_and(|r| is_affirmative(r))),
            PromptType::Input => PromptResult::String(response.cloned().unwrap_or_default()),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::new())
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that captures finish messages.
#[derive(Debug, Default)]
pub struct MockSpinner {
    messages: Vec<String>,
    finish_message: Option<String>,
    succeeded: Option<bool>,
}

impl MockSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all messages set during spinning.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn finish_message(&self) -> Option<&str> {
        self.finish_message.as_deref()
    }

    /// `Some(true)` after `finish_success`, `Some(false)` after `finish_error`.
    pub fn succeeded(&self) -> Option<bool> {
        self.succeeded
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
        self.succeeded = Some(true);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
        self.succeeded = Some(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_output() {
        let mut ui = MockUI::new();
        ui.message("hello");
        ui.success("done");
        ui.warning("careful");
        ui.error("broken");
        ui.show_header("Title");
        assert!(ui.has_message("hello"));
        assert!(ui.has_success("done"));
        assert!(ui.has_warning("careful"));
        assert!(ui.has_error("broken"));
        assert_eq!(ui.headers(), ["Title"]);
    }

    #[test]
    fn configured_response_wins_over_default() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("go", "no");
        let result = ui.prompt(&Prompt::confirm("go", "Go?", true)).unwrap();
        assert_eq!(result, PromptResult::Bool(false));
        assert_eq!(ui.prompts_shown(), ["go"]);
    }

    #[test]
    fn unanswered_prompts_are_empty() {
        let mut ui = MockUI::new();
        let confirm = Prompt {
            default: None,
            ..Prompt::confirm("c", "C?", true)
        };
        assert_eq!(ui.prompt(&confirm).unwrap(), PromptResult::Bool(false));
        assert_eq!(
            ui.prompt(&Prompt::input("i", "I")).unwrap(),
            PromptResult::String(String::new())
        );
    }

    #[test]
    fn spinner_records_state() {
        let mut spinner = MockSpinner::new();
        spinner.set_message("working");
        spinner.finish_error("failed");
        assert_eq!(spinner.messages(), ["working"]);
        assert_eq!(spinner.finish_message(), Some("failed"));
        assert_eq!(spinner.succeeded(), Some(false));
    }

    #[test]
    fn start_spinner_is_recorded() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("Cloning");
        spinner.finish_success("Cloned");
        assert_eq!(ui.spinners(), ["Cloning"]);
    }
}
