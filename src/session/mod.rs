//! Session Host Module
//!
//! Runs the demo inside a named, detached terminal-multiplexer session so it
//! keeps running after the SSH connection or boot hook that started it goes
//! away. What happens when the name is already taken is decided by the
//! configured [`DuplicatePolicy`].

pub mod tmux;

use log::{debug, info};

use crate::config::{DuplicatePolicy, SessionSettings};
use crate::error::{LaunchError, Result};
use crate::launcher::CommandSpec;

pub use tmux::Tmux;

/// Operations the session host needs from a terminal multiplexer.
pub trait Multiplexer {
    /// Whether the multiplexer can be run on this machine.
    fn is_available(&self) -> bool;

    fn has_session(&self, name: &str) -> Result<bool>;

    /// Create a detached session running `command`. With `keep_shell` an
    /// interactive shell replaces the command when it exits, so the session
    /// stays open for inspection.
    fn new_session(&self, name: &str, command: &CommandSpec, keep_shell: bool) -> Result<()>;

    fn kill_session(&self, name: &str) -> Result<()>;
}

/// Result of a persistent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A new session was created.
    Created,
    /// A session of that name existed and was left running.
    AlreadyRunning,
    /// A session of that name existed and was replaced.
    Restarted,
}

/// Wraps launches in persistent sessions.
#[derive(Debug, Clone)]
pub struct SessionHost<M: Multiplexer> {
    mux: M,
    policy: DuplicatePolicy,
    keep_shell: bool,
}

impl SessionHost<Tmux> {
    pub fn tmux(settings: &SessionSettings) -> Self {
        Self::new(Tmux::default(), settings)
    }
}

impl<M: Multiplexer> SessionHost<M> {
    pub fn new(mux: M, settings: &SessionSettings) -> Self {
        Self {
            mux,
            policy: settings.policy,
            keep_shell: settings.keep_shell,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn multiplexer(&self) -> &M {
        &self.mux
    }

    /// Create or reuse the session `name` running `command`.
    ///
    /// # Errors
    /// * `Session` - the multiplexer is unavailable or failed, or `name` is
    ///   empty
    /// * `DuplicateSession` - the session exists and the policy is `reject`
    pub fn run_persistent(&self, name: &str, command: &CommandSpec) -> Result<SessionOutcome> {
        if name.trim().is_empty() {
            return Err(LaunchError::Session {
                reason: "session name must not be empty".to_string(),
            });
        }

        let name = &session_name(name);

        if !self.mux.is_available() {
            return Err(LaunchError::Session {
                reason: "terminal multiplexer is not available".to_string(),
            });
        }

        if !self.mux.has_session(name)? {
            self.mux.new_session(name, command, self.keep_shell)?;
            info!("Created session '{}'", name);
            return Ok(SessionOutcome::Created);
        }

        debug!("Session '{}' exists, policy {:?}", name, self.policy);
        match self.policy {
            DuplicatePolicy::Reuse => Ok(SessionOutcome::AlreadyRunning),
            DuplicatePolicy::Restart => {
                self.mux.kill_session(name)?;
                self.mux.new_session(name, command, self.keep_shell)?;
                info!("Restarted session '{}'", name);
                Ok(SessionOutcome::Restarted)
            }
            DuplicatePolicy::Reject => Err(LaunchError::DuplicateSession {
                name: name.to_string(),
            }),
        }
    }
}

/// Session name as tmux stores it: `.` and `:` become `_`. Lookups must use
/// the stored form or an existing session is never found.
pub fn session_name(name: &str) -> String {
    name.trim().replace(['.', ':'], "_")
}


#[cfg(test)]
mod tests {
    use super::testing::FakeMux;
    use super::*;
    use std::path::PathBuf;

    fn command() -> CommandSpec {
        CommandSpec {
            program: "python3".to_string(),
            args: vec!["synth.py".to_string()],
            env: vec![("DISPLAY".to_string(), ":0.0".to_string())],
            current_dir: PathBuf::from("/home/pi/synth"),
        }
    }

    fn host(policy: DuplicatePolicy) -> SessionHost<FakeMux> {
        let settings = SessionSettings {
            policy,
            ..Default::default()
        };
        SessionHost::new(FakeMux::default(), &settings)
    }

    #[test]
    fn test_reuse_is_idempotent() {
        let host = host(DuplicatePolicy::Reuse);

        let first = host.run_persistent("synth", &command()).unwrap();
        let second = host.run_persistent("synth", &command()).unwrap();

        assert_eq!(first, SessionOutcome::Created);
        assert_eq!(second, SessionOutcome::AlreadyRunning);
        assert_eq!(*host.multiplexer().created.borrow(), 1);
    }

    #[test]
    fn test_restart_replaces_session() {
        let host = host(DuplicatePolicy::Restart);

        host.run_persistent("synth", &command()).unwrap();
        let second = host.run_persistent("synth", &command()).unwrap();

        assert_eq!(second, SessionOutcome::Restarted);
        assert_eq!(*host.multiplexer().created.borrow(), 2);
        assert_eq!(*host.multiplexer().killed.borrow(), 1);
        assert_eq!(host.multiplexer().sessions.borrow().len(), 1);
    }

    #[test]
    fn test_reject_duplicate() {
        let host = host(DuplicatePolicy::Reject);

        host.run_persistent("synth", &command()).unwrap();
        let err = host.run_persistent("synth", &command()).unwrap_err();

        assert!(matches!(err, LaunchError::DuplicateSession { .. }));
        assert_eq!(err.exit_code(), 5);
        assert_eq!(*host.multiplexer().created.borrow(), 1);
    }

    #[test]
    fn test_dotted_name_reused() {
        let host = host(DuplicatePolicy::Reuse);

        let first = host.run_persistent("demo.synth:0", &command()).unwrap();
        let second = host.run_persistent("demo.synth:0", &command()).unwrap();

        assert_eq!(first, SessionOutcome::Created);
        assert_eq!(second, SessionOutcome::AlreadyRunning);
        assert_eq!(*host.multiplexer().created.borrow(), 1);
        assert!(host
            .multiplexer()
            .sessions
            .borrow()
            .contains_key("demo_synth_0"));
    }

    #[test]
    fn test_session_name_normalised() {
        assert_eq!(session_name("synth"), "synth");
        assert_eq!(session_name(" pi.synth:1 "), "pi_synth_1");
    }

    #[test]
    fn test_distinct_names_coexist() {
        let host = host(DuplicatePolicy::Reject);
        host.run_persistent("synth", &command()).unwrap();
        host.run_persistent("synth-2", &command()).unwrap();
        assert_eq!(host.multiplexer().sessions.borrow().len(), 2);
    }

    #[test]
    fn test_unavailable_multiplexer() {
        let mux = FakeMux {
            unavailable: true,
            ..Default::default()
        };
        let host = SessionHost::new(mux, &SessionSettings::default());

        let err = host.run_persistent("synth", &command()).unwrap_err();
        assert!(matches!(err, LaunchError::Session { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_empty_name_rejected() {
        let host = host(DuplicatePolicy::Reuse);
        assert!(host.run_persistent(" ", &command()).is_err());
    }
}
