//! Privilege escalation for provisioning commands.

use crate::error::{Result, SetupError};
use crate::probe::Host;

/// Name of the escalation tool looked up on PATH.
pub const ESCALATION_TOOL: &str = "sudo";

/// How privileged commands are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Already root; commands run as-is.
    None,
    /// Commands are prefixed with `sudo`.
    Sudo,
}

impl Escalation {
    /// Pick the escalation mode for this host.
    ///
    /// Root needs nothing. Otherwise `sudo` must resolve on PATH, or the
    /// run cannot continue.
    pub fn resolve(host: &dyn Host) -> Result<Self> {
        if host.is_elevated() {
            return Ok(Self::None);
        }
        if host.resolve(ESCALATION_TOOL).is_some() {
            tracing::debug!("not root, escalating with {}", ESCALATION_TOOL);
            return Ok(Self::Sudo);
        }
        Err(SetupError::PrivilegeUnavailable)
    }

    /// Prefix `command` for privileged execution.
    pub fn wrap(&self, command: &str) -> String {
        match self {
            Self::None => command.to_string(),
            Self::Sudo => format!("{} {}", ESCALATION_TOOL, command),
        }
    }
}
