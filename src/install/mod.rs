//! Provisioning: packages, privileges, downloads and the agent source.
//!
//! Nothing here makes decisions beyond conditional dispatch on the
//! found-map. Every side effect is a command issued through a
//! [`CommandRunner`](crate::shell::CommandRunner).

pub mod downloader;
pub mod installer;
pub mod packages;
pub mod platform;
pub mod privilege;
pub mod source;

pub use downloader::Downloader;
pub use installer::{InstallAction, InstallPlan, Installer};
pub use packages::{default_interpreter, packages_for};
pub use platform::{parse_os_release, PackageManagerKind, Platform};
pub use privilege::Escalation;
pub use source::SourceInstall;
