//! amplify-setup CLI entry point.

use std::process::ExitCode;

use amplify_setup::agent::SystemAccounts;
use amplify_setup::cli::Cli;
use amplify_setup::config::{load_settings, SetupSettings};
use amplify_setup::probe::SystemHost;
use amplify_setup::runner::{SetupOptions, Workflow, CONFIRM_KEY};
use amplify_setup::shell::{is_ci, ShellRunner};
use amplify_setup::ui::{create_ui, NonInteractiveUI, UserInterface};
use amplify_setup::Result;
use clap::Parser;
use console::Term;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("amplify_setup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("amplify_setup=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("amplify-setup starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
        console::set_colors_enabled(false);
    }

    let interactive = !cli.yes && !is_ci() && Term::stdout().is_term();
    let mut ui: Box<dyn UserInterface> = if cli.yes {
        Box::new(NonInteractiveUI::new(cli.output_mode()).assume_yes(CONFIRM_KEY))
    } else {
        create_ui(interactive, cli.output_mode())
    };

    match run(&cli, ui.as_mut()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli, ui: &mut dyn UserInterface) -> Result<()> {
    let settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => SetupSettings::default(),
    };

    let host = SystemHost::new();
    let runner = ShellRunner::new(cli.output_mode().shows_command_output())
        .with_env("DEBIAN_FRONTEND", "noninteractive");
    let accounts = SystemAccounts;

    let workflow = Workflow::new(&settings, &host, &runner, &accounts);

    if cli.probe_only {
        let found = workflow.probe();
        let json = serde_json::to_string_pretty(&found).map_err(anyhow::Error::from)?;
        println!("{}", json);
        return Ok(());
    }

    let options = SetupOptions {
        api_key: cli.api_key.clone(),
        hostname: cli.hostname.clone(),
    };
    workflow.run(&options, ui)?;
    Ok(())
}
