//! Configuration Module
//!
//! Launch parameters for the demo process and settings for the launcher itself.

pub mod launch;
pub mod settings;

pub use launch::LaunchConfiguration;
pub use settings::{DuplicatePolicy, LauncherSettings, SessionSettings};
