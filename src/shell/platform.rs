//! Process-level facts about the running environment.

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`,
/// `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|var| std::env::var(var).is_ok())
}

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Real uid and gid of the invoking user.
pub fn current_ids() -> (u32, u32) {
    #[cfg(unix)]
    {
        // SAFETY: getuid() and getgid() cannot fail and have no side effects
        unsafe { (libc::getuid(), libc::getgid()) }
    }

    #[cfg(not(unix))]
    {
        (0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_ci_does_not_panic() {
        let _ = is_ci();
    }

    #[cfg(unix)]
    #[test]
    fn elevation_matches_effective_uid() {
        let euid = unsafe { libc::geteuid() };
        assert_eq!(is_elevated(), euid == 0);
    }

    #[cfg(unix)]
    #[test]
    fn current_ids_match_libc() {
        let (uid, gid) = current_ids();
        assert_eq!(uid, unsafe { libc::getuid() });
        assert_eq!(gid, unsafe { libc::getgid() });
    }
}
