//! Target platform identification.

use std::fmt;
use std::path::Path;

use crate::error::{Result, SetupError};

/// Operating systems with a known package mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Debian,
    Ubuntu,
    CentOs,
    Rhel,
    Amazon,
    Fedora,
    FreeBsd,
}

/// Package manager family of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManagerKind {
    AptGet,
    Yum,
    Dnf,
    Pkg,
}

impl Platform {
    /// Map an os-release style identifier to a platform.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "debian" | "raspbian" => Some(Self::Debian),
            "ubuntu" => Some(Self::Ubuntu),
            "centos" => Some(Self::CentOs),
            "rhel" | "redhat" => Some(Self::Rhel),
            "amzn" | "amazon" => Some(Self::Amazon),
            "fedora" => Some(Self::Fedora),
            "freebsd" => Some(Self::FreeBsd),
            _ => None,
        }
    }

    pub fn package_manager(&self) -> PackageManagerKind {
        match self {
            Self::Debian | Self::Ubuntu => PackageManagerKind::AptGet,
            Self::CentOs | Self::Rhel | Self::Amazon => PackageManagerKind::Yum,
            Self::Fedora => PackageManagerKind::Dnf,
            Self::FreeBsd => PackageManagerKind::Pkg,
        }
    }

    /// Detect the running platform.
    pub fn detect() -> Result<Self> {
        let os_release = Path::new("/etc/os-release");
        if os_release.exists() {
            let text = std::fs::read_to_string(os_release)?;
            return parse_os_release(&text);
        }

        let kernel = std::env::consts::OS;
        Self::from_id(kernel).ok_or_else(|| SetupError::UnsupportedPlatform {
            id: kernel.to_string(),
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debian => "debian",
            Self::Ubuntu => "ubuntu",
            Self::CentOs => "centos",
            Self::Rhel => "rhel",
            Self::Amazon => "amzn",
            Self::Fedora => "fedora",
            Self::FreeBsd => "freebsd",
        };
        f.write_str(name)
    }
}

/// Resolve a platform from `/etc/os-release` contents.
///
/// `ID` is tried first, then each entry of `ID_LIKE` in order.
pub fn parse_os_release(text: &str) -> Result<Platform> {
    let field = |key: &str| -> Option<String> {
        text.lines().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k.trim() == key).then(|| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        })
    };

    let id = field("ID").unwrap_or_default();
    let like = field("ID_LIKE").unwrap_or_default();

    let platform = std::iter::once(id.as_str())
        .chain(like.split_whitespace())
        .find_map(Platform::from_id);

    platform.ok_or_else(|| SetupError::UnsupportedPlatform {
        id: if id.is_empty() {
            "unknown".to_string()
        } else {
            id.clone()
        },
    })
}
