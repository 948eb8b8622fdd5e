//! The provisioning sequence.
//!
//! Steps run strictly one after another and each one's output feeds the
//! next. The first failure aborts the run; nothing is retried or undone.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::agent::{
    ownership_for, render_file, resolve_owner_from_files, AccountDb, Ownership, ResolvedOwner,
    RuntimeDirs,
};
use crate::config::SetupSettings;
use crate::error::{Result, SetupError};
use crate::install::{
    default_interpreter, Downloader, Escalation, InstallPlan, Installer, Platform, SourceInstall,
};
use crate::probe::{default_specs, CommandSpec, EnvironmentProber, FoundMap, Host, INTERPRETER};
use crate::shell::CommandRunner;
use crate::ui::{Prompt, SpinnerHandle, UserInterface};

/// Prompt key of the install confirmation.
pub const CONFIRM_KEY: &str = "confirm_install";

/// Prompt key of the API key question.
pub const API_KEY_KEY: &str = "api_key";

/// Permission bits of the installed agent config.
const CONFIG_MODE: u32 = 0o644;

/// Name of the rendered config inside the checkout before it is copied.
///
/// The file holds the API key. It is created readable by the installing
/// user only and removed once copied.
const STAGED_CONFIG: &str = "agent.conf.staged";

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub api_key: Option<String>,
    pub hostname: Option<String>,
}

/// What a completed run did.
#[derive(Debug)]
pub struct SetupReport {
    pub found: FoundMap,
    pub interpreter: String,
    pub escalation: Escalation,
    pub owner: ResolvedOwner,
    pub ownership: Ownership,
}

/// Orchestrates one installation.
pub struct Workflow<'a> {
    settings: &'a SetupSettings,
    platform: Option<Platform>,
    host: &'a dyn Host,
    runner: &'a dyn CommandRunner,
    accounts: &'a dyn AccountDb,
}

impl<'a> Workflow<'a> {
    pub fn new(
        settings: &'a SetupSettings,
        host: &'a dyn Host,
        runner: &'a dyn CommandRunner,
        accounts: &'a dyn AccountDb,
    ) -> Self {
        Self {
            settings,
            platform: None,
            host,
            runner,
            accounts,
        }
    }

    /// Use `platform` instead of detecting it from the running system.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Probe list for the configured version targets.
    pub fn specs(&self) -> Vec<CommandSpec> {
        default_specs(&self.settings.version_targets)
    }

    /// Probe the host without changing anything.
    pub fn probe(&self) -> FoundMap {
        EnvironmentProber::new(self.host).probe(&self.specs())
    }

    /// Run the whole installation.
    pub fn run(&self, options: &SetupOptions, ui: &mut dyn UserInterface) -> Result<SetupReport> {
        let api_key = resolve_api_key(options, ui)?;

        ui.show_header("NGINX Amplify Agent");
        ui.message(&format!(
            "This installs missing build dependencies, builds the agent from {}\n\
             and writes {}.",
            self.settings.repository_url,
            self.settings.agent_config_path.display()
        ));
        let confirmed = ui
            .prompt(&Prompt::confirm(CONFIRM_KEY, "Continue?", false))?
            .as_bool()
            .unwrap_or(false);
        if !confirmed {
            return Err(SetupError::UserDeclined);
        }

        let platform = match self.platform {
            Some(platform) => platform,
            None => Platform::detect()?,
        };
        tracing::debug!("platform {}", platform);

        let escalation = Escalation::resolve(self.host)?;

        let specs = self.specs();
        let found = EnvironmentProber::new(self.host).probe(&specs);
        for spec in &specs {
            let answer = if found.is_found(&spec.name) { "yes" } else { "no" };
            ui.message(&format!("Checking if {} exists ... {}", spec.label(), answer));
        }

        let downloader = Downloader::select(&found)?;
        tracing::debug!("downloading with {}", downloader.name());

        let plan = InstallPlan::from_probe(&specs, &found, platform);
        if !plan.is_empty() {
            let installer = Installer::new(platform, escalation, self.runner);
            step(ui, "Installing missing packages", "Packages installed", || {
                installer.apply(&plan)
            })?;
        }

        let interpreter = found
            .invocation(INTERPRETER)
            .unwrap_or_else(|| default_interpreter(platform))
            .to_string();
        tracing::info!("using interpreter {}", interpreter);

        let source = SourceInstall {
            interpreter: &interpreter,
            downloader,
            escalation,
            runner: self.runner,
        };
        step(ui, "Installing pip", "pip installed", || {
            source.bootstrap(
                &self.settings.bootstrap_url,
                &self.settings.bootstrap_script_path(),
            )
        })?;
        let checkout = self.settings.checkout_dir.as_path();
        step(ui, "Fetching agent source", "Agent source fetched", || {
            source.clone_repository(&self.settings.repository_url, checkout)
        })?;
        step(ui, "Building agent", "Agent built", || {
            source.install_package(checkout)
        })?;

        self.write_config(&api_key, options.hostname.as_deref(), escalation)?;
        ui.success(&format!(
            "Config written to {}",
            self.settings.agent_config_path.display()
        ));

        let owner = resolve_owner_from_files(
            &self.settings.agent_config_path,
            &self.settings.server_config_path,
        );
        let ownership = if self.settings.runtime_dirs_owned_by_agent {
            ownership_for(&owner.name, self.accounts)
        } else {
            self.accounts.invoking_user()
        };
        RuntimeDirs::new(&self.settings.log_dir, &self.settings.pid_dir).create(
            ownership,
            escalation,
            self.runner,
        )?;

        self.show_banner(ui, &interpreter, &owner);

        Ok(SetupReport {
            found,
            interpreter,
            escalation,
            owner,
            ownership,
        })
    }

    /// Template the existing config is rendered from.
    ///
    /// A config left by an earlier install is kept as the base so local
    /// edits survive a reinstall.
    fn config_source(&self) -> PathBuf {
        if self.settings.agent_config_path.exists() {
            self.settings.agent_config_path.clone()
        } else {
            self.settings.template_path()
        }
    }

    fn write_config(
        &self,
        api_key: &str,
        hostname: Option<&str>,
        escalation: Escalation,
    ) -> Result<()> {
        let mut overrides = vec![("api_key", api_key)];
        if let Some(hostname) = hostname {
            overrides.push(("hostname", hostname));
        }
        let rendered = render_file(&self.config_source(), &overrides)?;

        let staged = self.settings.checkout_dir.join(STAGED_CONFIG);
        write_private(&staged, &rendered)?;

        let placed = self.place_config(&staged, escalation);
        if let Err(e) = std::fs::remove_file(&staged) {
            tracing::warn!("could not remove {}: {}", staged.display(), e);
        }
        placed
    }

    /// Copy the staged config to its installed location.
    ///
    /// `cp` carries over the staged file's owner-only mode, so the mode is
    /// reset for the agent account to read it.
    fn place_config(&self, staged: &Path, escalation: Escalation) -> Result<()> {
        let target = &self.settings.agent_config_path;
        if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
            self.runner
                .run(&escalation.wrap(&format!("mkdir -p '{}'", dir.display())), None)?;
        }
        self.runner.run(
            &escalation.wrap(&format!(
                "cp '{}' '{}'",
                staged.display(),
                target.display()
            )),
            None,
        )?;
        self.runner.run(
            &escalation.wrap(&format!("chmod {:o} '{}'", CONFIG_MODE, target.display())),
            None,
        )
    }

    fn show_banner(&self, ui: &mut dyn UserInterface, interpreter: &str, owner: &ResolvedOwner) {
        let agent = Path::new("/usr/bin/nginx-amplify-agent.py");
        let pid = self.settings.pid_dir.join("amplify-agent.pid");
        let control = |action: &str| {
            format!(
                "  sudo -u {} {} {} {} --config={} --pid={}",
                owner.name,
                interpreter,
                agent.display(),
                action,
                self.settings.agent_config_path.display(),
                pid.display()
            )
        };

        ui.success("NGINX Amplify Agent installed");
        ui.message("");
        ui.message(&format!("The agent will run as '{}'.", owner.name));
        ui.message("To start it:");
        ui.message(&control("start"));
        ui.message("To stop it:");
        ui.message(&control("stop"));
    }
}

/// Write `contents` to `path`, readable by the current user only.
fn write_private(path: &Path, contents: &str) -> Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // The mode above only applies to newly created files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())?;
    Ok(())
}

/// The API key from the command line, or asked for.
fn resolve_api_key(options: &SetupOptions, ui: &mut dyn UserInterface) -> Result<String> {
    if let Some(key) = options.api_key.as_deref().map(str::trim) {
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    let answer = match ui.prompt(&Prompt::input(API_KEY_KEY, "Amplify API key")) {
        Ok(answer) => answer.as_string(),
        Err(e) if !ui.is_interactive() => {
            tracing::debug!("no API key: {}", e);
            return Err(SetupError::MissingApiKey);
        }
        Err(e) => return Err(e),
    };
    let key = answer.trim();
    if key.is_empty() {
        return Err(SetupError::MissingApiKey);
    }
    Ok(key.to_string())
}

/// Run `action` behind a spinner.
fn step<F>(ui: &mut dyn UserInterface, running: &str, done: &str, action: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    let mut spinner: Box<dyn SpinnerHandle> = ui.start_spinner(running);
    match action() {
        Ok(()) => {
            spinner.finish_success(done);
            Ok(())
        }
        Err(e) => {
            spinner.finish_error(&format!("{} failed", running));
            Err(e)
        }
    }
}
