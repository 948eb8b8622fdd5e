//! amplify-setup - environment detection and source installation for the
//! NGINX Amplify agent.
//!
//! The installer probes the host for a suitable Python interpreter, its
//! development headers and a handful of build tools, installs whatever is
//! missing with the platform package manager, builds the agent from source
//! and writes its configuration.
//!
//! # Modules
//!
//! - [`probe`] - Environment probing and the found-map
//! - [`install`] - Package installation, privilege escalation and downloads
//! - [`agent`] - Config templating, owner resolution and runtime directories
//! - [`runner`] - The provisioning workflow
//! - [`shell`] - Shell command execution
//! - [`ui`] - Prompts, spinners, and terminal output
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Installer settings
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use amplify_setup::agent::replace_key_line;
//!
//! let conf = replace_key_line("[credentials]\napi_key =\n", "api_key", "abc123");
//! assert_eq!(conf, "[credentials]\napi_key = abc123\n");
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod probe;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{Result, SetupError};
