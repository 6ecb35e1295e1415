//! Synth Launcher - unattended start-up for the sensor synth demo
//!
//! Starts the demo process (`synth.py`) at boot with a fixed set of samples,
//! optionally inside a persistent tmux session so it survives SSH
//! disconnects, and appends one line per launch attempt to a launch log.
//!
//! # Architecture
//!
//! - `config`: launch parameters and launcher settings
//! - `launcher`: display setup, command construction, event log, detached spawn
//! - `session`: persistent-session host with a configurable duplicate policy
//! - `cli`: command-line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod launcher;
pub mod session;

pub use config::{LaunchConfiguration, LauncherSettings};
pub use error::{LaunchError, Result};
pub use launcher::{LaunchState, Launcher};
