//! tmux backend for the session host.

use std::process::{Command, Output, Stdio};

use log::debug;

use crate::error::{LaunchError, Result};
use crate::launcher::CommandSpec;
use crate::session::Multiplexer;

/// Shell that takes over a kept session once the demo exits.
const KEEP_SHELL_SUFFIX: &str = "exec \"${SHELL:-/bin/sh}\"";

/// Drives the `tmux` binary.
#[derive(Debug, Clone)]
pub struct Tmux {
    binary: String,
}

impl Default for Tmux {
    fn default() -> Self {
        Self {
            binary: "tmux".to_string(),
        }
    }
}

impl Tmux {
    /// Use a specific tmux binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("{} {}", self.binary, args.join(" "));
        Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| LaunchError::Session {
                reason: format!("failed to run {}: {}", self.binary, e),
            })
    }

    fn run_checked(&self, args: &[&str]) -> Result<()> {
        let output = self.run(args)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(LaunchError::Session {
                reason: format!(
                    "{} {} failed: {}",
                    self.binary,
                    args.first().copied().unwrap_or_default(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}

/// Exact-match target so `synth` never matches a session called `synth-2`.
fn target(name: &str) -> String {
    format!("={}", name)
}

/// Shell command run inside the session. Environment entries are prefixed
/// so they reach the demo without touching the tmux server's environment.
pub fn session_shell_command(command: &CommandSpec, keep_shell: bool) -> String {
    let mut line = String::new();
    for (key, value) in &command.env {
        let value = shlex::try_quote(value)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.clone());
        line.push_str(&format!("{}={} ", key, value));
    }
    line.push_str(&command.shell_line());

    if keep_shell {
        line.push_str("; ");
        line.push_str(KEEP_SHELL_SUFFIX);
    }
    line
}

impl Multiplexer for Tmux {
    fn is_available(&self) -> bool {
        self.run(&["-V"])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn has_session(&self, name: &str) -> Result<bool> {
        let output = self.run(&["has-session", "-t", &target(name)])?;
        Ok(output.status.success())
    }

    fn new_session(&self, name: &str, command: &CommandSpec, keep_shell: bool) -> Result<()> {
        let dir = command.current_dir.to_string_lossy();
        let shell_command = session_shell_command(command, keep_shell);
        self.run_checked(&["new-session", "-d", "-s", name, "-c", &dir, &shell_command])
    }

    fn kill_session(&self, name: &str) -> Result<()> {
        self.run_checked(&["kill-session", "-t", &target(name)])
    }
}
