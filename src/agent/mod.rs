//! Post-install materialization of the agent: config file, owning
//! account and runtime directories.

pub mod owner;
pub mod runtime_dirs;
pub mod template;

pub use owner::{resolve_owner, resolve_owner_from_files, OwnerSource, ResolvedOwner, DEFAULT_OWNER};
pub use runtime_dirs::{ownership_for, AccountDb, Ownership, RuntimeDirs, SystemAccounts};
pub use template::{materialize, render_file, replace_key_line};
