//! Synth Launcher CLI
//!
//! Command-line entry point used by boot scripts.

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use synth_launcher::cli::{commands, Cli, Commands, LaunchOverrides};
use synth_launcher::Result;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Synth Launcher v{}", env!("CARGO_PKG_VERSION"));

    match handle_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            if let Some(suggestion) = e.recovery_suggestion() {
                eprintln!("hint: {}", suggestion);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_command(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        // Boot scripts call the launcher bare.
        None => commands::launch(config, &LaunchOverrides::default()),
        Some(Commands::Launch {
            persistent,
            session_name,
            on_duplicate,
            display,
            dry_run,
        }) => {
            let overrides = LaunchOverrides {
                persistent,
                session_name,
                on_duplicate,
                display,
                dry_run,
            };
            commands::launch(config, &overrides)
        }
        Some(Commands::PrintCommand) => commands::print_command(config),
        Some(Commands::Validate) => commands::validate(config),
        Some(Commands::Session { name }) => commands::session(config, name.as_deref()),
        Some(Commands::History { limit }) => commands::show_history(config, limit),
        Some(Commands::InitConfig { path, force }) => commands::init_config(&path, force),
    }
}
