//! Shell command execution and process environment.

pub mod command;
pub mod platform;
pub mod runner;

pub use command::{execute, CommandOptions, CommandResult};
pub use platform::{current_ids, is_ci, is_elevated};
pub use runner::{CommandRunner, RecordingRunner, ShellRunner};
