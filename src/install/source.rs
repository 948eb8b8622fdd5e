//! Fetching and installing the agent from source.

use std::path::Path;

use crate::error::Result;
use crate::shell::CommandRunner;

use super::downloader::Downloader;
use super::privilege::Escalation;

/// Installs the agent package with a resolved interpreter.
pub struct SourceInstall<'a> {
    pub interpreter: &'a str,
    pub downloader: Downloader,
    pub escalation: Escalation,
    pub runner: &'a dyn CommandRunner,
}

impl SourceInstall<'_> {
    /// Download the bootstrap installer to `script`, then run it.
    ///
    /// The download is its own command so a failed fetch stops the run
    /// before the interpreter is started.
    pub fn bootstrap(&self, url: &str, script: &Path) -> Result<()> {
        self.runner
            .run(&self.downloader.fetch_command(url, script), None)?;
        let command = self
            .escalation
            .wrap(&format!("{} '{}'", self.interpreter, script.display()));
        self.runner.run(&command, None)
    }

    /// Replace any previous checkout with a fresh shallow clone.
    pub fn clone_repository(&self, url: &str, checkout: &Path) -> Result<()> {
        let target = checkout.display();
        self.runner
            .run(&self.escalation.wrap(&format!("rm -rf '{}'", target)), None)?;
        self.runner
            .run(&format!("git clone --depth 1 '{}' '{}'", url, target), None)
    }

    /// Run the package's own installer from inside the checkout.
    pub fn install_package(&self, checkout: &Path) -> Result<()> {
        let command = self
            .escalation
            .wrap(&format!("{} setup.py install", self.interpreter));
        self.runner.run(&command, Some(checkout))
    }
}
