//! Error handling for the synth launcher
//!
//! Every error maps to a distinct process exit code so a boot-time service
//! manager can tell a bad sample path from a missing executable.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Main error type for launcher operations
#[derive(Error, Debug)]
pub enum LaunchError {
    // Configuration Errors
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Sample file not found: {path}")]
    SampleNotFound { path: PathBuf },

    #[error("Invalid sample file: {path}: {reason}")]
    InvalidSample { path: PathBuf, reason: String },

    // Environment Errors
    #[error("Environment error: {reason}")]
    Environment { reason: String },

    #[error("Demo directory does not exist: {path}")]
    MissingDemoRoot { path: PathBuf },

    // Process Errors
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    // Session Errors
    #[error("Session error: {reason}")]
    Session { reason: String },

    #[error("Session '{name}' is already running")]
    DuplicateSession { name: String },

    // Logging Errors
    #[error("Failed to write launch log {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Settings Errors
    #[error("Invalid settings file {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LaunchError {
    /// Process exit code reported to whatever invoked the launcher.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::Configuration { .. }
            | LaunchError::SampleNotFound { .. }
            | LaunchError::InvalidSample { .. } => 2,
            LaunchError::Environment { .. } | LaunchError::MissingDemoRoot { .. } => 3,
            LaunchError::Spawn { .. } => 4,
            LaunchError::Session { .. } | LaunchError::DuplicateSession { .. } => 5,
            LaunchError::LogWrite { .. } => 6,
            LaunchError::Settings { .. } | LaunchError::Io(_) => 1,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            LaunchError::Configuration { .. }
            | LaunchError::SampleNotFound { .. }
            | LaunchError::InvalidSample { .. } => "CONFIGURATION_ERROR",
            LaunchError::Environment { .. } | LaunchError::MissingDemoRoot { .. } => {
                "ENVIRONMENT_ERROR"
            }
            LaunchError::Spawn { .. } => "SPAWN_ERROR",
            LaunchError::Session { .. } | LaunchError::DuplicateSession { .. } => "SESSION_ERROR",
            LaunchError::LogWrite { .. } => "LOG_WRITE_ERROR",
            LaunchError::Settings { .. } => "SETTINGS_ERROR",
            LaunchError::Io(_) => "IO_ERROR",
        }
    }

    /// Fatal errors abort the launch attempt. Session facility and log
    /// failures degrade to running without persistence or without a log
    /// line. A rejected duplicate session is fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, LaunchError::Session { .. } | LaunchError::LogWrite { .. })
    }

    /// Returns true if a spawn retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LaunchError::Spawn { .. })
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            LaunchError::SampleNotFound { .. } => {
                Some("Check the WAV paths are relative to the demo directory.")
            }
            LaunchError::InvalidSample { .. } => {
                Some("Re-export the sample as a PCM WAV file.")
            }
            LaunchError::MissingDemoRoot { .. } => {
                Some("Set demo_root in the settings file or pass --config.")
            }
            LaunchError::Spawn { .. } => {
                Some("Check the executable exists and is runnable by this user.")
            }
            LaunchError::Session { .. } => Some("Install tmux or launch without --persistent."),
            LaunchError::DuplicateSession { .. } => {
                Some("Use the 'restart' duplicate policy or kill the existing session.")
            }
            LaunchError::LogWrite { .. } => Some("Check the log directory is writable."),
            LaunchError::Settings { .. } => {
                Some("Regenerate the file with 'synth-launcher init-config'.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            LaunchError::Configuration {
                reason: "x".to_string(),
            },
            LaunchError::Environment {
                reason: "x".to_string(),
            },
            LaunchError::Spawn {
                program: "synth.py".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
            LaunchError::Session {
                reason: "x".to_string(),
            },
            LaunchError::LogWrite {
                path: PathBuf::from("/nope/log"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            },
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_fatality() {
        let log = LaunchError::LogWrite {
            path: PathBuf::from("log"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!log.is_fatal());
        assert!(LaunchError::DuplicateSession {
            name: "synth".to_string()
        }
        .is_fatal());
        assert!(LaunchError::SampleNotFound {
            path: PathBuf::from("kick.wav")
        }
        .is_fatal());
    }

    #[test]
    fn test_error_codes() {
        let err = LaunchError::MissingDemoRoot {
            path: PathBuf::from("/home/pi/synth"),
        };
        assert_eq!(err.error_code(), "ENVIRONMENT_ERROR");
        assert!(err.recovery_suggestion().is_some());
    }
}
