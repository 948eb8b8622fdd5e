//! Shell command execution.

use crate::error::{Result, SetupError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// POSIX shell used for every provisioning command. Login shells and rc
/// files are never involved.
const SHELL: &str = "/bin/sh";

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

/// Execute a command through `/bin/sh -c`.
///
/// A non-zero exit is reported in the result, not as an error; only a
/// failure to spawn the shell is an `Err`.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(SHELL);
    cmd.arg("-c").arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::inherit());
    cmd.stdout(if options.capture_stdout {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    cmd.stderr(if options.capture_stderr {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });

    tracing::debug!("exec: {}", command);
    let output = cmd.output().map_err(|e| {
        tracing::debug!("failed to spawn {}: {}", SHELL, e);
        SetupError::CommandFailed {
            command: command.to_string(),
            code: None,
        }
    })?;

    let result = CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration: start.elapsed(),
        success: output.status.success(),
    };
    tracing::debug!(
        "exit {:?} after {:?}: {}",
        result.exit_code,
        result.duration,
        command
    );
    Ok(result)
}
