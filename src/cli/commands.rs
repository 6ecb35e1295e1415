//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::{info, warn};

use crate::cli::LaunchOverrides;
use crate::config::LauncherSettings;
use crate::error::{LaunchError, Result};
use crate::launcher::{LaunchOutcome, Launcher};
use crate::session::{SessionHost, SessionOutcome};

/// Apply command-line overrides on top of loaded settings.
pub fn apply_overrides(settings: &mut LauncherSettings, overrides: &LaunchOverrides) {
    if let Some(display) = &overrides.display {
        settings.display = display.clone();
    }
    if let Some(name) = &overrides.session_name {
        settings.session.name = name.clone();
        settings.session.enabled = true;
    }
    if let Some(policy) = overrides.on_duplicate {
        settings.session.policy = policy;
    }
    if overrides.persistent {
        settings.session.enabled = true;
    }
}

/// Log the launch and start the demo, directly or in a session.
pub fn launch(config_path: Option<&Path>, overrides: &LaunchOverrides) -> Result<()> {
    let mut settings = LauncherSettings::load_or_default(config_path)?;
    apply_overrides(&mut settings, overrides);

    if overrides.dry_run {
        let launcher = Launcher::new(settings);
        let spec = launcher.prepare(&launcher.settings().launch)?;
        println!("Would run in {}:", spec.current_dir.display());
        println!("  {}", spec.shell_line());
        return Ok(());
    }

    let host = SessionHost::tmux(&settings.session);
    let mut launcher = Launcher::new(settings);
    let report = launcher.run(Some(&host))?;

    match report.outcome {
        LaunchOutcome::Direct(handle) => {
            println!("Demo started (pid {})", handle.pid);
        }
        LaunchOutcome::Session { name, outcome } => match outcome {
            SessionOutcome::Created => println!("Demo started in session '{}'", name),
            SessionOutcome::Restarted => println!("Demo restarted in session '{}'", name),
            SessionOutcome::AlreadyRunning => {
                println!("Session '{}' already running, left untouched", name)
            }
        },
    }

    if !report.logged {
        warn!("Launch {} was not recorded in the launch log", report.launch_id);
    }

    Ok(())
}

/// Print the demo command line.
pub fn print_command(config_path: Option<&Path>) -> Result<()> {
    let settings = LauncherSettings::load_or_default(config_path)?;
    let display = crate::launcher::configure_display(&settings.display)?;
    let spec = crate::launcher::CommandSpec::for_demo(&settings, &settings.launch, &display);

    println!("{}", spec.shell_line());

    Ok(())
}

/// Check configuration and environment without launching.
pub fn validate(config_path: Option<&Path>) -> Result<()> {
    let settings = LauncherSettings::load_or_default(config_path)?;
    info!("Validating demo at: {}", settings.demo_root.display());

    let launcher = Launcher::new(settings);
    launcher.prepare(&launcher.settings().launch)?;

    println!("Configuration OK");
    for (role, path) in launcher.settings().launch.samples() {
        println!("  {:<7} {}", role, path.display());
    }

    Ok(())
}

/// Start the demo through the session host only.
pub fn session(config_path: Option<&Path>, name: Option<&str>) -> Result<()> {
    let mut settings = LauncherSettings::load_or_default(config_path)?;
    if let Some(name) = name {
        settings.session.name = name.to_string();
    }

    let launcher = Launcher::new(settings);
    if let Err(e) = launcher.event_log().record_launch() {
        warn!("{} (continuing without launch log)", e);
    }

    let spec = launcher.prepare(&launcher.settings().launch)?;

    let session = &launcher.settings().session;
    let host = SessionHost::tmux(session);
    let outcome = host.run_persistent(&session.name, &spec)?;

    println!("Session '{}': {:?}", session.name, outcome);

    Ok(())
}

/// Show recent launches.
pub fn show_history(config_path: Option<&Path>, limit: usize) -> Result<()> {
    let settings = LauncherSettings::load_or_default(config_path)?;
    let log = crate::launcher::EventLog::new(settings.resolved_log_path());

    let entries = log.entries()?;
    if entries.is_empty() {
        println!("No launches recorded in {}", log.path().display());
        return Ok(());
    }

    println!("Launch History ({}):", log.path().display());
    println!("{:-<60}", "");

    let skip = entries.len().saturating_sub(limit);
    for entry in entries.iter().skip(skip) {
        println!(
            "{}  {}",
            entry.timestamp.format(crate::launcher::event_log::TIMESTAMP_FORMAT),
            entry.message
        );
    }

    println!("{:-<60}", "");
    println!("Total launches: {}", entries.len());

    Ok(())
}

/// Write default settings.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(LaunchError::Configuration {
            reason: format!("{} already exists (use --force to overwrite)", path.display()),
        });
    }

    LauncherSettings::default().save(path)?;
    println!("Settings written: {}", path.display());

    Ok(())
}
