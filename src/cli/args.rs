//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::ui::OutputMode;

/// Install the NGINX Amplify agent from source.
#[derive(Debug, Parser)]
#[command(name = "amplify-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Amplify API key written into the agent config
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Hostname reported by the agent
    #[arg(long, env = "AMPLIFY_HOSTNAME")]
    pub hostname: Option<String>,

    /// Answer yes to the install confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// YAML file overriding the installer settings
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Only probe the environment and print the result as JSON
    #[arg(long)]
    pub probe_only: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Output mode selected by `--quiet` / `--verbose`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}
