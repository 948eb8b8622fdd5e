//! Choice of download tool.

use std::path::Path;

use crate::error::{Result, SetupError};
use crate::probe::FoundMap;

/// A command-line tool able to save a URL to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Downloader {
    Curl,
    Wget,
}

impl Downloader {
    /// Pick a downloader from the probe results, preferring curl.
    pub fn select(found: &FoundMap) -> Result<Self> {
        if found.is_found("curl") {
            Ok(Self::Curl)
        } else if found.is_found("wget") {
            Ok(Self::Wget)
        } else {
            Err(SetupError::NoDownloader)
        }
    }

    /// Command saving the body of `url` to `dest`, failing on HTTP errors.
    pub fn fetch_command(&self, url: &str, dest: &Path) -> String {
        match self {
            Self::Curl => format!("curl -fsSL -o '{}' '{}'", dest.display(), url),
            Self::Wget => format!("wget -q -O '{}' '{}'", dest.display(), url),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::Wget => "wget",
        }
    }
}
