//! Launcher Settings
//!
//! Where the demo lives, how to start it, and where to record launches.
//! Settings come from built-in defaults or a JSON file; any field missing
//! from the file keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::launch::LaunchConfiguration;
use crate::error::{LaunchError, Result};

/// Default installation directory of the demo.
pub const DEFAULT_DEMO_ROOT: &str = "/home/pi/synth";

/// Default demo executable, relative to the demo root.
pub const DEFAULT_EXECUTABLE: &str = "synth.py";

/// Default interpreter used to run the executable.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Default display the demo opens its window on.
pub const DEFAULT_DISPLAY: &str = ":0.0";

/// Default launch log file name, relative to the demo root.
pub const DEFAULT_LOG_FILE: &str = "synth-launch.log";

/// Default persistent session name.
pub const DEFAULT_SESSION_NAME: &str = "synth";

/// What to do when a session with the requested name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Leave the running session alone and report success.
    #[default]
    Reuse,
    /// Kill the running session and start a fresh one.
    Restart,
    /// Refuse with a session error.
    Reject,
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reuse" => Ok(DuplicatePolicy::Reuse),
            "restart" => Ok(DuplicatePolicy::Restart),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(format!(
                "unknown duplicate policy '{}' (expected reuse, restart or reject)",
                other
            )),
        }
    }
}

/// Persistent session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Wrap the demo in a persistent terminal session.
    pub enabled: bool,

    /// Session name.
    pub name: String,

    /// Policy for an already-running session of the same name.
    pub policy: DuplicatePolicy,

    /// Keep an interactive shell in the session after the demo exits.
    pub keep_shell: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            name: DEFAULT_SESSION_NAME.to_string(),
            policy: DuplicatePolicy::default(),
            keep_shell: true,
        }
    }
}

/// Everything the launcher needs besides the demo's own arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// Installation root; the demo runs with this as its working directory.
    pub demo_root: PathBuf,

    /// Demo executable. Run directly it is resolved against `demo_root`;
    /// behind an interpreter it is passed as given and found from the
    /// working directory, which is `demo_root`.
    pub executable: PathBuf,

    /// Interpreter prefix, e.g. `python3`. `None` runs the executable directly.
    pub interpreter: Option<String>,

    /// Value for `DISPLAY` in the demo's environment.
    pub display: String,

    /// Launch log, resolved against `demo_root` when relative.
    pub log_path: PathBuf,

    /// Persistent session settings.
    pub session: SessionSettings,

    /// Extra spawn attempts after a spawn failure. Zero keeps the
    /// single-attempt behaviour of the boot scripts.
    pub spawn_retries: u32,

    /// Delay between spawn attempts in milliseconds.
    pub retry_delay_ms: u64,

    /// Arguments for the demo process.
    pub launch: LaunchConfiguration,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            demo_root: PathBuf::from(DEFAULT_DEMO_ROOT),
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            interpreter: Some(DEFAULT_INTERPRETER.to_string()),
            display: DEFAULT_DISPLAY.to_string(),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            session: SessionSettings::default(),
            spawn_retries: 0,
            retry_delay_ms: 1000,
            launch: LaunchConfiguration::default(),
        }
    }
}

impl LauncherSettings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LaunchError::Configuration {
                    reason: format!("settings file not found: {}", path.display()),
                }
            } else {
                LaunchError::Io(e)
            }
        })?;

        let settings: LauncherSettings =
            serde_json::from_str(&content).map_err(|e| LaunchError::Settings {
                path: path.to_path_buf(),
                source: e,
            })?;

        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| LaunchError::Settings {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Absolute path of the launch log.
    pub fn resolved_log_path(&self) -> PathBuf {
        crate::config::launch::resolve(&self.demo_root, &self.log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("launcher.json");
        fs::write(
            &path,
            r#"{ "demo_root": "/srv/synth", "session": { "enabled": true } }"#,
        )
        .unwrap();

        let settings = LauncherSettings::load(&path).unwrap();
        assert_eq!(settings.demo_root, PathBuf::from("/srv/synth"));
        assert!(settings.session.enabled);
        assert_eq!(settings.session.name, DEFAULT_SESSION_NAME);
        assert_eq!(settings.display, DEFAULT_DISPLAY);
        assert_eq!(settings.launch, LaunchConfiguration::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("launcher.json");

        let mut settings = LauncherSettings::default();
        settings.session.policy = DuplicatePolicy::Restart;
        settings.launch.sample_count = 32;
        settings.save(&path).unwrap();

        let loaded = LauncherSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("launcher.json");
        fs::write(&path, "{ not json").unwrap();

        let err = LauncherSettings::load(&path).unwrap_err();
        assert!(matches!(err, LaunchError::Settings { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = LauncherSettings::load(Path::new("/nonexistent/launcher.json")).unwrap_err();
        assert!(matches!(err, LaunchError::Configuration { .. }));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Restart".parse::<DuplicatePolicy>(), Ok(DuplicatePolicy::Restart));
        assert!("dedupe".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn test_log_path_resolution() {
        let settings = LauncherSettings {
            demo_root: PathBuf::from("/home/pi/synth"),
            ..Default::default()
        };
        assert_eq!(
            settings.resolved_log_path(),
            PathBuf::from("/home/pi/synth/synth-launch.log")
        );
    }
}
