//! The host the prober inspects.
//!
//! [`Host`] is the seam between detection logic and the machine: command
//! lookup, running a query, and checking paths. [`SystemHost`] is the real
//! implementation; tests substitute a scripted host.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Read-only view of the machine being probed.
pub trait Host {
    /// Resolve a command name to a runnable binary.
    fn resolve(&self, command: &str) -> Option<PathBuf>;

    /// Run `command args...` and return trimmed stdout if it exits zero.
    fn query(&self, command: &str, args: &[String]) -> Option<String>;

    /// Whether `path` exists on disk.
    fn path_exists(&self, path: &Path) -> bool;

    /// Whether the current process already has root privileges.
    fn is_elevated(&self) -> bool;
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does not shell
/// out to `which` or `command -v`; both differ between systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    if tool.contains('/') {
        let direct = PathBuf::from(tool);
        return (direct.is_file() && is_executable(&direct)).then_some(direct);
    }
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// The machine this process runs on.
#[derive(Debug, Clone)]
pub struct SystemHost {
    path: Vec<PathBuf>,
}

impl SystemHost {
    /// Snapshot the current PATH.
    pub fn new() -> Self {
        Self::with_path(parse_system_path())
    }

    /// Use an explicit search path instead of `$PATH`.
    pub fn with_path(path: Vec<PathBuf>) -> Self {
        Self { path }
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for SystemHost {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        resolve_tool_path(command, &self.path)
    }

    fn query(&self, command: &str, args: &[String]) -> Option<String> {
        let binary = self.resolve(command)?;
        let output = Command::new(&binary)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            tracing::debug!("query {} exited with {:?}", command, output.status.code());
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!("query {} -> {:?}", command, stdout);
        Some(stdout)
    }

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_elevated(&self) -> bool {
        crate::shell::is_elevated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Create a fake binary at a path (creates parent dirs as needed).
    fn create_script(path: &Path, body: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn resolve_tool_path_finds_first_match() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_script(&dir_a.join("git"), "exit 0");
        create_script(&dir_b.join("git"), "exit 0");

        let result = resolve_tool_path("git", &[dir_a.clone(), dir_b]);
        assert_eq!(result, Some(dir_a.join("git")));
    }

    #[test]
    fn resolve_tool_path_returns_none_when_not_found() {
        let temp = TempDir::new().unwrap();
        let result = resolve_tool_path("git", &[temp.path().to_path_buf()]);
        assert!(result.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_path_skips_non_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        fs::create_dir_all(&dir_a).unwrap();
        fs::write(dir_a.join("gcc"), "not executable").unwrap();
        fs::set_permissions(dir_a.join("gcc"), fs::Permissions::from_mode(0o644)).unwrap();
        create_script(&dir_b.join("gcc"), "exit 0");

        let result = resolve_tool_path("gcc", &[dir_a, dir_b.clone()]);
        assert_eq!(result, Some(dir_b.join("gcc")));
    }

    #[test]
    fn is_executable_returns_false_for_nonexistent_file() {
        assert!(!is_executable(Path::new("/nonexistent/path/to/file")));
    }

    #[cfg(unix)]
    #[test]
    fn query_captures_trimmed_stdout() {
        let temp = TempDir::new().unwrap();
        create_script(&temp.path().join("python2.7"), "echo '2.7'");

        let host = SystemHost::with_path(vec![temp.path().to_path_buf()]);
        assert_eq!(
            host.query("python2.7", &["-c".to_string(), "ignored".to_string()]),
            Some("2.7".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn query_fails_on_nonzero_exit() {
        let temp = TempDir::new().unwrap();
        create_script(&temp.path().join("python"), "exit 3");

        let host = SystemHost::with_path(vec![temp.path().to_path_buf()]);
        assert!(host.query("python", &[]).is_none());
    }

    #[test]
    fn query_fails_for_unresolvable_command() {
        let host = SystemHost::with_path(vec![]);
        assert!(host.query("this-command-does-not-exist-12345", &[]).is_none());
    }
}
