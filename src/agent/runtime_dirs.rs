//! Log and pid directories for the agent.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::install::Escalation;
use crate::shell::{current_ids, CommandRunner};

/// Permission bits applied to every runtime directory.
pub const RUNTIME_DIR_MODE: u32 = 0o755;

/// Numeric owner applied to the runtime directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

/// Lookup of OS accounts.
pub trait AccountDb {
    /// uid and primary gid of `name`, if the account exists.
    fn lookup(&self, name: &str) -> Option<Ownership>;

    /// uid and gid of the user running this process.
    fn invoking_user(&self) -> Ownership;
}

/// Accounts from the system passwd database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAccounts;

impl AccountDb for SystemAccounts {
    #[cfg(unix)]
    fn lookup(&self, name: &str) -> Option<Ownership> {
        let c_name = std::ffi::CString::new(name).ok()?;
        // SAFETY: getpwnam returns NULL or a pointer to static storage that
        // stays valid until the next passwd call; fields are copied out at once.
        unsafe {
            let entry = libc::getpwnam(c_name.as_ptr());
            if entry.is_null() {
                return None;
            }
            Some(Ownership {
                uid: (*entry).pw_uid,
                gid: (*entry).pw_gid,
            })
        }
    }

    #[cfg(not(unix))]
    fn lookup(&self, _name: &str) -> Option<Ownership> {
        None
    }

    fn invoking_user(&self) -> Ownership {
        let (uid, gid) = current_ids();
        Ownership { uid, gid }
    }
}

/// Ownership giving the runtime directories to the agent owner.
///
/// The resolved agent owner when that account exists, otherwise the user
/// running the installer. Only used when the settings ask for it; by
/// default the directories belong to the invoking user.
pub fn ownership_for(owner: &str, accounts: &dyn AccountDb) -> Ownership {
    accounts.lookup(owner).unwrap_or_else(|| {
        tracing::warn!("account '{}' not found, using the invoking user", owner);
        accounts.invoking_user()
    })
}

/// Directories the agent writes to at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDirs {
    pub log_dir: PathBuf,
    pub pid_dir: PathBuf,
}

impl RuntimeDirs {
    pub fn new(log_dir: impl Into<PathBuf>, pid_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            pid_dir: pid_dir.into(),
        }
    }

    fn all(&self) -> [&Path; 2] {
        [self.log_dir.as_path(), self.pid_dir.as_path()]
    }

    /// Commands creating, chmod-ing and chown-ing each directory.
    pub fn commands(&self, ownership: Ownership, escalation: Escalation) -> Vec<String> {
        self.all()
            .iter()
            .flat_map(|dir| {
                let dir = dir.display();
                [
                    format!("mkdir -p '{}'", dir),
                    format!("chmod {:o} '{}'", RUNTIME_DIR_MODE, dir),
                    format!("chown {}:{} '{}'", ownership.uid, ownership.gid, dir),
                ]
            })
            .map(|c| escalation.wrap(&c))
            .collect()
    }

    /// Create the directories through `runner`.
    pub fn create(
        &self,
        ownership: Ownership,
        escalation: Escalation,
        runner: &dyn CommandRunner,
    ) -> Result<()> {
        for command in self.commands(ownership, escalation) {
            runner.run(&command, None)?;
        }
        Ok(())
    }
}
