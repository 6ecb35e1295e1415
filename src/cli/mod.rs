//! CLI Module
//!
//! Command-line interface used by boot scripts and by hand over SSH.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DuplicatePolicy;

/// Synth demo launcher - start the sensor synth unattended
#[derive(Parser, Debug)]
#[command(name = "synth-launcher")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (JSON). Built-in defaults are used when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log the launch and start the demo detached
    #[command(name = "launch")]
    Launch {
        /// Run inside a persistent tmux session
        #[arg(short, long)]
        persistent: bool,

        /// Session name (implies --persistent)
        #[arg(long)]
        session_name: Option<String>,

        /// What to do if the session already exists: reuse, restart, reject
        #[arg(long)]
        on_duplicate: Option<DuplicatePolicy>,

        /// Display target for the demo, e.g. :0.0
        #[arg(short, long)]
        display: Option<String>,

        /// Validate and print the command without starting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the demo command line
    #[command(name = "print-command")]
    PrintCommand,

    /// Check samples, demo directory and display without launching
    #[command(name = "validate")]
    Validate,

    /// Start the demo in a persistent session, failing if tmux is unavailable
    #[command(name = "session")]
    Session {
        /// Session name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show recent launches from the launch log
    #[command(name = "history")]
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Write the default settings to a file
    #[command(name = "init-config")]
    InitConfig {
        /// Destination path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Overrides for the `launch` subcommand.
#[derive(Debug, Default, Clone)]
pub struct LaunchOverrides {
    pub persistent: bool,
    pub session_name: Option<String>,
    pub on_duplicate: Option<DuplicatePolicy>,
    pub display: Option<String>,
    pub dry_run: bool,
}
