//! Installer settings.
//!
//! Settings come from an optional YAML file given with `--settings`.
//! Every key is optional; missing keys keep the stock agent layout.
//!
//! # Example
//!
//! ```
//! use amplify_setup::config::parse_settings;
//! use std::path::Path;
//!
//! let settings = parse_settings("log_dir: /srv/amplify/log", Path::new("setup.yml")).unwrap();
//! assert_eq!(settings.log_dir, Path::new("/srv/amplify/log"));
//! assert_eq!(settings.pid_dir, Path::new("/var/run/amplify-agent"));
//! ```

pub mod settings;

pub use settings::{load_settings, parse_settings, SetupSettings};
