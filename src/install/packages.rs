//! Logical tool name to package name mapping.

use super::platform::{PackageManagerKind, Platform};

/// Packages providing `logical` on `platform`.
///
/// `interpreter_version` is the version the probe matched, if any. The
/// header package follows it so headers and interpreter agree.
/// Unknown logical names map to a package of the same name.
pub fn packages_for(
    platform: Platform,
    logical: &str,
    interpreter_version: Option<&str>,
) -> Vec<String> {
    let manager = platform.package_manager();
    if logical == "python-dev" {
        return header_packages(manager, interpreter_version);
    }

    let names: &[&str] = match (manager, logical) {
        (PackageManagerKind::AptGet, "python") => &["python2.7"],
        (PackageManagerKind::AptGet, "gcc") => &["gcc", "make"],

        (PackageManagerKind::Yum | PackageManagerKind::Dnf, "python") => &["python2"],
        (PackageManagerKind::Yum | PackageManagerKind::Dnf, "gcc") => &["gcc", "make"],

        (PackageManagerKind::Pkg, "python") => &["python27"],
        (PackageManagerKind::Pkg, "gcc") => &["gcc", "gmake"],

        (_, other) => return vec![other.to_string()],
    };
    names.iter().map(|s| s.to_string()).collect()
}

/// Development headers matching the interpreter `version`.
///
/// Without a matched version the headers of the platform default
/// interpreter are installed.
fn header_packages(manager: PackageManagerKind, version: Option<&str>) -> Vec<String> {
    match manager {
        PackageManagerKind::AptGet => {
            vec![format!("python{}-dev", version.unwrap_or("2.7"))]
        }
        // 2.6 is the system python of EL6, shipped as plain `python`.
        PackageManagerKind::Yum | PackageManagerKind::Dnf => match version {
            Some("2.6") => vec!["python-devel".to_string()],
            _ => vec!["python2-devel".to_string()],
        },
        PackageManagerKind::Pkg => Vec::new(),
    }
}

/// Interpreter invocation provided by the `python` package on `platform`.
///
/// Used for the remaining steps when the probe found no acceptable
/// interpreter and one was installed instead.
pub fn default_interpreter(platform: Platform) -> &'static str {
    match platform.package_manager() {
        PackageManagerKind::AptGet => "python2.7",
        PackageManagerKind::Yum | PackageManagerKind::Dnf => "python2",
        PackageManagerKind::Pkg => "python2.7",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debian_python_headers() {
        assert_eq!(
            packages_for(Platform::Debian, "python-dev", None),
            vec!["python2.7-dev"]
        );
    }

    #[test]
    fn debian_headers_follow_matched_version() {
        assert_eq!(
            packages_for(Platform::Debian, "python-dev", Some("2.6")),
            vec!["python2.6-dev"]
        );
        assert_eq!(
            packages_for(Platform::Ubuntu, "python-dev", Some("2.7")),
            vec!["python2.7-dev"]
        );
    }

    #[test]
    fn centos_python_headers() {
        assert_eq!(
            packages_for(Platform::CentOs, "python-dev", Some("2.7")),
            vec!["python2-devel"]
        );
        assert_eq!(
            packages_for(Platform::CentOs, "python-dev", Some("2.6")),
            vec!["python-devel"]
        );
    }

    #[test]
    fn freebsd_headers_ship_with_interpreter() {
        assert!(packages_for(Platform::FreeBsd, "python-dev", Some("2.7")).is_empty());
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(packages_for(Platform::Ubuntu, "git", None), vec!["git"]);
        assert_eq!(packages_for(Platform::Amazon, "wget", None), vec!["wget"]);
    }

    #[test]
    fn default_interpreter_matches_python_package() {
        assert_eq!(default_interpreter(Platform::Ubuntu), "python2.7");
        assert_eq!(default_interpreter(Platform::Rhel), "python2");
    }
}
