//! Installer settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};
use crate::probe::VersionTargetList;

/// Tunables of an installation run.
///
/// Every field has a default, so an empty file (or no file) yields the
/// stock layout of the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupSettings {
    /// Acceptable interpreter versions, most preferred first.
    pub version_targets: VersionTargetList,

    /// Script that installs the interpreter's package manager.
    pub bootstrap_url: String,

    /// Git repository holding the agent source.
    pub repository_url: String,

    /// Where the agent source is checked out.
    pub checkout_dir: PathBuf,

    /// Config template, relative to the checkout.
    pub config_template: PathBuf,

    /// Installed agent config.
    pub agent_config_path: PathBuf,

    /// Nginx config consulted when resolving the agent owner.
    pub server_config_path: PathBuf,

    pub log_dir: PathBuf,
    pub pid_dir: PathBuf,

    /// Chown the log and pid directories to the resolved agent owner
    /// instead of the user running the installer.
    pub runtime_dirs_owned_by_agent: bool,
}

impl Default for SetupSettings {
    fn default() -> Self {
        Self {
            version_targets: VersionTargetList::new(["2.7", "2.6"]),
            bootstrap_url: "https://bootstrap.pypa.io/pip/2.7/get-pip.py".to_string(),
            repository_url: "https://github.com/nginxinc/nginx-amplify-agent.git".to_string(),
            checkout_dir: PathBuf::from("/tmp/nginx-amplify-agent"),
            config_template: PathBuf::from("etc/agent.conf.default"),
            agent_config_path: PathBuf::from("/etc/amplify-agent/agent.conf"),
            server_config_path: PathBuf::from("/etc/nginx/nginx.conf"),
            log_dir: PathBuf::from("/var/log/amplify-agent"),
            pid_dir: PathBuf::from("/var/run/amplify-agent"),
            runtime_dirs_owned_by_agent: false,
        }
    }
}

impl SetupSettings {
    /// Absolute path of the config template inside the checkout.
    pub fn template_path(&self) -> PathBuf {
        self.checkout_dir.join(&self.config_template)
    }

    /// Where the bootstrap script is saved before it runs.
    ///
    /// A sibling of the checkout, which is replaced by the clone.
    pub fn bootstrap_script_path(&self) -> PathBuf {
        let mut path = self.checkout_dir.clone().into_os_string();
        path.push("-get-pip.py");
        PathBuf::from(path)
    }
}

/// Load settings from a YAML file.
///
/// # Errors
///
/// Returns `SettingsNotFound` if the file does not exist and
/// `SettingsParseError` if it is not valid settings YAML.
pub fn load_settings(path: &Path) -> Result<SetupSettings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SetupError::SettingsNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SetupError::Io(e)
        }
    })?;

    parse_settings(&content, path)
}

/// Parse YAML settings. `source_path` is used for error reporting.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<SetupSettings> {
    if content.trim().is_empty() {
        return Ok(SetupSettings::default());
    }
    serde_yaml::from_str(content).map_err(|e| SetupError::SettingsParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
