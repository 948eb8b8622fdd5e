//! The seam through which every provisioning side effect passes.
//!
//! Package installs, downloads, clones and file placement are all issued
//! as shell commands through a [`CommandRunner`]. Any failure aborts the
//! run; there is no retry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};

use super::command::{execute, CommandOptions};

/// Runs one provisioning command to completion.
pub trait CommandRunner {
    /// Run `command`, optionally in `cwd`. Non-zero exit is `CommandFailed`.
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<()>;
}

/// Production runner backed by `/bin/sh`.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    /// Stream command output to the terminal instead of capturing it.
    show_output: bool,
    env: HashMap<String, String>,
}

impl ShellRunner {
    pub fn new(show_output: bool) -> Self {
        Self {
            show_output,
            env: HashMap::new(),
        }
    }

    /// Set an environment variable for every command this runner issues.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<()> {
        let options = CommandOptions {
            cwd: cwd.map(Path::to_path_buf),
            env: self.env.clone(),
            capture_stdout: !self.show_output,
            capture_stderr: !self.show_output,
        };

        let result = execute(command, &options)?;
        if result.success {
            return Ok(());
        }

        let lines: Vec<&str> = result.stderr.lines().collect();
        for line in &lines[lines.len().saturating_sub(20)..] {
            tracing::error!("{}", line);
        }
        Err(SetupError::CommandFailed {
            command: command.to_string(),
            code: result.exit_code,
        })
    }
}

/// Runner that records commands instead of executing them.
///
/// Commands containing a configured failure pattern return
/// `CommandFailed` with exit code 1.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: RefCell<Vec<(String, Option<PathBuf>)>>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command containing `pattern`.
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            fail_on: Some(pattern.to_string()),
        }
    }

    /// Commands issued so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().iter().map(|(c, _)| c.clone()).collect()
    }

    /// Working directory passed with each command.
    pub fn cwds(&self) -> Vec<Option<PathBuf>> {
        self.commands.borrow().iter().map(|(_, d)| d.clone()).collect()
    }

    /// Whether any issued command contains `fragment`.
    pub fn ran(&self, fragment: &str) -> bool {
        self.commands.borrow().iter().any(|(c, _)| c.contains(fragment))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<()> {
        self.commands
            .borrow_mut()
            .push((command.to_string(), cwd.map(Path::to_path_buf)));
        match &self.fail_on {
            Some(pattern) if command.contains(pattern.as_str()) => Err(SetupError::CommandFailed {
                command: command.to_string(),
                code: Some(1),
            }),
            _ => Ok(()),
        }
    }
}
