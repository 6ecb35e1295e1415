//! Launcher Module
//!
//! Starts the demo process detached and returns immediately. A full launch
//! attempt ([`Launcher::run`]) runs in a fixed order: log line, display
//! setup, working directory check, configuration check, spawn.

pub mod command;
pub mod display;
pub mod event_log;
pub mod spawner;

use std::thread;
use std::time::Duration;

use log::{info, warn};
use uuid::Uuid;

use crate::config::{LaunchConfiguration, LauncherSettings};
use crate::error::{LaunchError, Result};
use crate::session::{Multiplexer, SessionHost, SessionOutcome};

pub use command::{demo_args, CommandSpec};
pub use display::{configure_display, DisplayTarget};
pub use event_log::{EventLog, LaunchLogEntry, LAUNCH_MESSAGE};
pub use spawner::{DetachedSpawner, ProcessHandle, ProcessSpawner};

/// Launcher lifecycle. `Running` is terminal: the launcher never observes
/// the demo's own exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    NotStarted,
    Running,
}

/// How the demo ended up running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Spawned directly as a detached child.
    Direct(ProcessHandle),
    /// Handed to a persistent session.
    Session { name: String, outcome: SessionOutcome },
}

/// Summary of one launch attempt.
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub launch_id: Uuid,
    pub outcome: LaunchOutcome,
    /// False when the log line could not be written.
    pub logged: bool,
}

/// Starts the demo process.
pub struct Launcher<S: ProcessSpawner = DetachedSpawner> {
    settings: LauncherSettings,
    spawner: S,
    state: LaunchState,
}

impl Launcher<DetachedSpawner> {
    pub fn new(settings: LauncherSettings) -> Self {
        Self::with_spawner(settings, DetachedSpawner)
    }
}

impl<S: ProcessSpawner> Launcher<S> {
    pub fn with_spawner(settings: LauncherSettings, spawner: S) -> Self {
        Self {
            settings,
            spawner,
            state: LaunchState::NotStarted,
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    pub fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn event_log(&self) -> EventLog {
        EventLog::new(self.settings.resolved_log_path())
    }

    /// Check the environment and configuration and build the demo command.
    /// Nothing is spawned.
    pub fn prepare(&self, config: &LaunchConfiguration) -> Result<CommandSpec> {
        let display = configure_display(&self.settings.display)?;

        let root = &self.settings.demo_root;
        if !root.is_dir() {
            return Err(LaunchError::MissingDemoRoot { path: root.clone() });
        }

        config.validate(root)?;

        Ok(CommandSpec::for_demo(&self.settings, config, &display))
    }

    /// Start the demo detached and return its handle without waiting.
    ///
    /// # Errors
    /// * `Configuration` family - bad sample count or sample files
    /// * `Environment` family - empty display, missing demo root, or the
    ///   launcher is already running
    /// * `Spawn` - the executable could not be started after all retries
    pub fn launch(&mut self, config: &LaunchConfiguration) -> Result<ProcessHandle> {
        self.ensure_not_started()?;
        let spec = self.prepare(config)?;
        let handle = self.spawn_with_retry(&spec)?;

        info!("Demo started (pid {}): {}", handle.pid, handle.command_line);
        self.state = LaunchState::Running;
        Ok(handle)
    }

    /// Full launch attempt using the configuration from settings.
    ///
    /// Logging is best-effort. When a session host is given and session
    /// settings are enabled the demo runs inside it; if the session facility
    /// fails the demo is spawned directly instead.
    pub fn run<M: Multiplexer>(&mut self, session: Option<&SessionHost<M>>) -> Result<LaunchReport> {
        let launch_id = Uuid::new_v4();
        info!("Launch attempt {}", launch_id);

        let logged = match self.event_log().record_launch() {
            Ok(()) => true,
            Err(e) => {
                warn!("{} (continuing without launch log)", e);
                false
            }
        };

        let config = self.settings.launch.clone();

        if let Some(host) = session.filter(|_| self.settings.session.enabled) {
            self.ensure_not_started()?;
            let spec = self.prepare(&config)?;
            let name = crate::session::session_name(&self.settings.session.name);

            match host.run_persistent(&name, &spec) {
                Ok(outcome) => {
                    info!("Demo session '{}': {:?}", name, outcome);
                    self.state = LaunchState::Running;
                    return Ok(LaunchReport {
                        launch_id,
                        outcome: LaunchOutcome::Session { name, outcome },
                        logged,
                    });
                }
                Err(e) if !e.is_fatal() => {
                    warn!("{} (launching without a persistent session)", e);
                }
                Err(e) => return Err(e),
            }
        }

        let handle = self.launch(&config)?;
        Ok(LaunchReport {
            launch_id,
            outcome: LaunchOutcome::Direct(handle),
            logged,
        })
    }

    fn ensure_not_started(&self) -> Result<()> {
        match self.state {
            LaunchState::NotStarted => Ok(()),
            LaunchState::Running => Err(LaunchError::Environment {
                reason: "demo already launched by this launcher".to_string(),
            }),
        }
    }

    fn spawn_with_retry(&mut self, spec: &CommandSpec) -> Result<ProcessHandle> {
        let attempts = self.settings.spawn_retries + 1;
        let delay = Duration::from_millis(self.settings.retry_delay_ms);

        let mut attempt = 1;
        loop {
            match self.spawner.spawn(spec) {
                Ok(handle) => return Ok(handle),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!("Spawn attempt {}/{} failed: {}", attempt, attempts, e);
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::launch::{
        DEFAULT_DRONE_WAV, DEFAULT_KICK_WAV, DEFAULT_MELODY_WAV, DEFAULT_SNARE_WAV,
    };
    use chrono::Local;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::path::Path;
    use tempfile::TempDir;

    /// Records spawn calls and fails the first `failures` of them.
    #[derive(Default)]
    struct RecordingSpawner {
        calls: Vec<CommandSpec>,
        failures: u32,
    }

    impl ProcessSpawner for RecordingSpawner {
        fn spawn(&mut self, spec: &CommandSpec) -> Result<ProcessHandle> {
            self.calls.push(spec.clone());
            if self.failures > 0 {
                self.failures -= 1;
                return Err(LaunchError::Spawn {
                    program: spec.program.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            Ok(ProcessHandle {
                pid: 4242,
                command_line: spec.shell_line(),
                started_at: Local::now(),
            })
        }
    }

    fn write_wav(path: &Path) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();
    }

    fn demo_settings() -> (TempDir, LauncherSettings) {
        let dir = TempDir::new().unwrap();
        for name in [
            DEFAULT_MELODY_WAV,
            DEFAULT_DRONE_WAV,
            DEFAULT_KICK_WAV,
            DEFAULT_SNARE_WAV,
        ] {
            write_wav(&dir.path().join(name));
        }
        let settings = LauncherSettings {
            demo_root: dir.path().to_path_buf(),
            retry_delay_ms: 0,
            ..Default::default()
        };
        (dir, settings)
    }

    #[test]
    fn test_launch_spawns_once() {
        let (_dir, settings) = demo_settings();
        let config = settings.launch.clone();
        let mut launcher = Launcher::with_spawner(settings, RecordingSpawner::default());
        assert_eq!(launcher.state(), LaunchState::NotStarted);

        let handle = launcher.launch(&config).unwrap();

        assert_eq!(handle.pid, 4242);
        assert_eq!(launcher.spawner().calls.len(), 1);
        assert_eq!(launcher.state(), LaunchState::Running);

        let spec = &launcher.spawner().calls[0];
        assert_eq!(spec.env, vec![("DISPLAY".to_string(), ":0.0".to_string())]);
        assert_eq!(&spec.current_dir, &launcher.settings().demo_root);
    }

    #[test]
    fn test_launch_does_not_touch_own_environment() {
        let (_dir, mut settings) = demo_settings();
        settings.display = ":7.3".to_string();
        let config = settings.launch.clone();
        let before = std::env::var("DISPLAY").ok();

        let mut launcher = Launcher::with_spawner(settings, RecordingSpawner::default());
        launcher.launch(&config).unwrap();

        assert_eq!(std::env::var("DISPLAY").ok(), before);
    }

    #[test]
    fn test_missing_sample_prevents_spawn() {
        let (dir, settings) = demo_settings();
        std::fs::remove_file(dir.path().join(DEFAULT_DRONE_WAV)).unwrap();
        let config = settings.launch.clone();
        let mut launcher = Launcher::with_spawner(settings, RecordingSpawner::default());

        let err = launcher.launch(&config).unwrap_err();

        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert!(launcher.spawner().calls.is_empty());
        assert_eq!(launcher.state(), LaunchState::NotStarted);
    }

    #[test]
    fn test_missing_demo_root() {
        let settings = LauncherSettings {
            demo_root: "/nonexistent/synth".into(),
            ..Default::default()
        };
        let config = settings.launch.clone();
        let mut launcher = Launcher::with_spawner(settings, RecordingSpawner::default());

        let err = launcher.launch(&config).unwrap_err();
        assert!(matches!(err, LaunchError::MissingDemoRoot { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_second_launch_rejected() {
        let (_dir, settings) = demo_settings();
        let config = settings.launch.clone();
        let mut launcher = Launcher::with_spawner(settings, RecordingSpawner::default());

        launcher.launch(&config).unwrap();
        let err = launcher.launch(&config).unwrap_err();

        assert!(matches!(err, LaunchError::Environment { .. }));
        assert_eq!(launcher.spawner().calls.len(), 1);
    }

    #[test]
    fn test_spawn_failure_without_retries() {
        let (_dir, settings) = demo_settings();
        let config = settings.launch.clone();
        let spawner = RecordingSpawner {
            failures: 1,
            ..Default::default()
        };
        let mut launcher = Launcher::with_spawner(settings, spawner);

        let err = launcher.launch(&config).unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
        assert_eq!(launcher.spawner().calls.len(), 1);
    }

    #[test]
    fn test_spawn_retries_are_bounded() {
        let (_dir, mut settings) = demo_settings();
        settings.spawn_retries = 2;
        let config = settings.launch.clone();

        let spawner = RecordingSpawner {
            failures: 2,
            ..Default::default()
        };
        let mut launcher = Launcher::with_spawner(settings.clone(), spawner);
        launcher.launch(&config).unwrap();
        assert_eq!(launcher.spawner().calls.len(), 3);

        let spawner = RecordingSpawner {
            failures: 5,
            ..Default::default()
        };
        let mut launcher = Launcher::with_spawner(settings, spawner);
        assert!(launcher.launch(&config).is_err());
        assert_eq!(launcher.spawner().calls.len(), 3);
    }
}
