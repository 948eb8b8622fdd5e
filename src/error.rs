//! Error types for setup operations.
//!
//! This module defines [`SetupError`], the error type used throughout the
//! installer, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - A probe miss is never an error; it shows up as `found = false` and
//!   drives a compensating install instead
//! - Every other failure propagates to `main`, which prints it and exits
//! - There is no local recovery or retry anywhere in the run

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for setup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The confirmation prompt was answered negatively.
    #[error("Installation cancelled by user")]
    UserDeclined,

    /// Not running as root and no escalation tool is available.
    #[error("Not running as root and 'sudo' is not available")]
    PrivilegeUnavailable,

    /// Neither of the supported download tools is installed.
    #[error("Neither 'curl' nor 'wget' is available, cannot download files")]
    NoDownloader,

    /// No API key was supplied and none could be asked for.
    #[error("No API key given. Set API_KEY or pass --api-key")]
    MissingApiKey,

    /// The host operating system has no known package mapping.
    #[error("Unsupported platform: {id}")]
    UnsupportedPlatform { id: String },

    /// An external command exited non-zero or could not be spawned.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Settings file not found at the given location.
    #[error("Settings not found: {path}")]
    SettingsNotFound { path: PathBuf },

    /// Failed to parse the settings file.
    #[error("Failed to parse settings at {path}: {message}")]
    SettingsParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SetupError {
    /// Process exit code for this error.
    ///
    /// Every failure, including a declined confirmation, exits with 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_declined_mentions_cancel() {
        assert!(SetupError::UserDeclined.to_string().contains("cancelled"));
    }

    #[test]
    fn no_downloader_names_both_tools() {
        let msg = SetupError::NoDownloader.to_string();
        assert!(msg.contains("curl"));
        assert!(msg.contains("wget"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SetupError::CommandFailed {
            command: "apt-get install -y git".into(),
            code: Some(100),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt-get install -y git"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn settings_parse_error_displays_path_and_message() {
        let err = SetupError::SettingsParseError {
            path: PathBuf::from("/etc/setup.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/setup.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn unsupported_platform_displays_id() {
        let err = SetupError::UnsupportedPlatform { id: "plan9".into() };
        assert!(err.to_string().contains("plan9"));
    }

    #[test]
    fn every_error_exits_with_one() {
        let errors = [
            SetupError::UserDeclined,
            SetupError::PrivilegeUnavailable,
            SetupError::NoDownloader,
            SetupError::MissingApiKey,
            SetupError::CommandFailed {
                command: "git clone".into(),
                code: None,
            },
        ];
        for err in errors {
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SetupError = io_err.into();
        assert!(matches!(err, SetupError::Io(_)));
    }
}
