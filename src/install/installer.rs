//! Installing tools the probe did not find.
//!
//! The installer reads the found-map once and issues one package-manager
//! invocation per missing tool. Installation follows the order of the
//! probe list, never map iteration order.

use crate::error::Result;
use crate::probe::{CommandSpec, FoundMap, INTERPRETER};
use crate::shell::CommandRunner;

use super::packages::packages_for;
use super::platform::{PackageManagerKind, Platform};
use super::privilege::Escalation;

/// One install invocation for one missing logical tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallAction {
    pub tool: String,
    pub packages: Vec<String>,
}

/// Ordered set of installs derived from a found-map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    pub actions: Vec<InstallAction>,
}

impl InstallPlan {
    /// Build the plan for every spec whose probe came back missing.
    ///
    /// Header packages follow the interpreter version the probe matched.
    pub fn from_probe(specs: &[CommandSpec], found: &FoundMap, platform: Platform) -> Self {
        let version = found.version(INTERPRETER);
        let actions = specs
            .iter()
            .filter(|spec| !found.is_found(&spec.name))
            .filter_map(|spec| {
                let packages = packages_for(platform, &spec.name, version);
                if packages.is_empty() {
                    tracing::debug!("{} has no package on {}, skipping", spec.name, platform);
                    return None;
                }
                Some(InstallAction {
                    tool: spec.name.clone(),
                    packages,
                })
            })
            .collect();
        Self { actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Issues package-manager commands for an [`InstallPlan`].
pub struct Installer<'a> {
    platform: Platform,
    escalation: Escalation,
    runner: &'a dyn CommandRunner,
}

impl<'a> Installer<'a> {
    pub fn new(platform: Platform, escalation: Escalation, runner: &'a dyn CommandRunner) -> Self {
        Self {
            platform,
            escalation,
            runner,
        }
    }

    /// Command refreshing the package index, where the manager needs one.
    pub fn refresh_command(&self) -> Option<String> {
        match self.platform.package_manager() {
            PackageManagerKind::AptGet => Some(self.escalation.wrap("apt-get update")),
            _ => None,
        }
    }

    /// Command installing `packages` non-interactively.
    pub fn install_command(&self, packages: &[String]) -> String {
        let base = match self.platform.package_manager() {
            PackageManagerKind::AptGet => "apt-get install -y",
            PackageManagerKind::Yum => "yum install -y",
            PackageManagerKind::Dnf => "dnf install -y",
            PackageManagerKind::Pkg => "pkg install -y",
        };
        self.escalation
            .wrap(&format!("{} {}", base, packages.join(" ")))
    }

    /// Execute the plan. The first failing command aborts it.
    pub fn apply(&self, plan: &InstallPlan) -> Result<()> {
        if plan.is_empty() {
            return Ok(());
        }

        if let Some(refresh) = self.refresh_command() {
            self.runner.run(&refresh, None)?;
        }

        for action in &plan.actions {
            tracing::info!("installing {} ({})", action.tool, action.packages.join(", "));
            self.runner
                .run(&self.install_command(&action.packages), None)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{default_specs, EnvironmentProber, Host, VersionTargetList};
    use crate::shell::RecordingRunner;
    use std::path::{Path, PathBuf};

    struct ToolsHost(Vec<&'static str>);

    impl Host for ToolsHost {
        fn resolve(&self, command: &str) -> Option<PathBuf> {
            self.0.contains(&command).then(|| PathBuf::from(command))
        }
        fn query(&self, _command: &str, _args: &[String]) -> Option<String> {
            None
        }
        fn path_exists(&self, _path: &Path) -> bool {
            false
        }
        fn is_elevated(&self) -> bool {
            true
        }
    }

    /// Debian box whose only interpreter is python2.6, without headers.
    struct OldPythonHost;

    impl Host for OldPythonHost {
        fn resolve(&self, command: &str) -> Option<PathBuf> {
            ["python2.6", "curl"]
                .contains(&command)
                .then(|| PathBuf::from(command))
        }
        fn query(&self, command: &str, args: &[String]) -> Option<String> {
            let header_query = args.iter().any(|a| a.contains("INCLUDEPY"));
            (command == "python2.6" && !header_query).then(|| "2.6".to_string())
        }
        fn path_exists(&self, _path: &Path) -> bool {
            false
        }
        fn is_elevated(&self) -> bool {
            true
        }
    }

    fn plan_for(tools: Vec<&'static str>, platform: Platform) -> InstallPlan {
        let specs = default_specs(&VersionTargetList::new(["2.7", "2.6"]));
        let found = EnvironmentProber::new(&ToolsHost(tools)).probe(&specs);
        InstallPlan::from_probe(&specs, &found, platform)
    }

    #[test]
    fn plan_follows_declaration_order() {
        let plan = plan_for(vec!["curl"], Platform::Debian);
        let tools: Vec<_> = plan.actions.iter().map(|a| a.tool.as_str()).collect();
        assert_eq!(tools, vec!["python", "python-dev", "git", "wget", "gcc"]);
    }

    #[test]
    fn header_package_matches_found_interpreter() {
        let specs = default_specs(&VersionTargetList::new(["2.7", "2.6"]));
        let found = EnvironmentProber::new(&OldPythonHost).probe(&specs);
        let plan = InstallPlan::from_probe(&specs, &found, Platform::Debian);

        assert_eq!(plan.actions[0].tool, "python-dev");
        assert_eq!(plan.actions[0].packages, vec!["python2.6-dev"]);
    }

    #[test]
    fn plan_is_empty_when_everything_is_found() {
        let specs = vec![CommandSpec::exists("git")];
        let found = EnvironmentProber::new(&ToolsHost(vec!["git"])).probe(&specs);
        assert!(InstallPlan::from_probe(&specs, &found, Platform::Ubuntu).is_empty());
    }

    #[test]
    fn plan_skips_tools_without_packages() {
        let plan = plan_for(vec!["curl", "wget", "git", "gcc"], Platform::FreeBsd);
        let tools: Vec<_> = plan.actions.iter().map(|a| a.tool.as_str()).collect();
        assert_eq!(tools, vec!["python"]);
    }

    #[test]
    fn apply_refreshes_then_installs_one_command_per_tool() {
        let runner = RecordingRunner::new();
        let plan = plan_for(vec!["curl", "wget", "python-dev", "gcc"], Platform::Ubuntu);
        Installer::new(Platform::Ubuntu, Escalation::Sudo, &runner)
            .apply(&plan)
            .unwrap();

        assert_eq!(
            runner.commands(),
            vec![
                "sudo apt-get update",
                "sudo apt-get install -y python2.7",
                "sudo apt-get install -y python2.7-dev",
                "sudo apt-get install -y git",
            ]
        );
    }

    #[test]
    fn apply_uses_yum_without_refresh() {
        let runner = RecordingRunner::new();
        let plan = plan_for(vec!["curl", "wget", "git"], Platform::CentOs);
        Installer::new(Platform::CentOs, Escalation::None, &runner)
            .apply(&plan)
            .unwrap();

        let commands = runner.commands();
        assert_eq!(commands[0], "yum install -y python2");
        assert!(commands.iter().all(|c| c.starts_with("yum install -y")));
        assert!(commands.contains(&"yum install -y gcc make".to_string()));
    }

    #[test]
    fn apply_does_nothing_for_empty_plan() {
        let runner = RecordingRunner::new();
        Installer::new(Platform::Debian, Escalation::None, &runner)
            .apply(&InstallPlan::default())
            .unwrap();
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn apply_stops_at_first_failure() {
        let runner = RecordingRunner::failing_on("python2.7-dev");
        let plan = plan_for(vec!["curl"], Platform::Debian);
        let result = Installer::new(Platform::Debian, Escalation::None, &runner).apply(&plan);

        assert!(result.is_err());
        assert!(!runner.ran("install -y git"));
    }
}
