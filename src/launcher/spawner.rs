//! Process spawning.
//!
//! The launcher never waits on the demo. The real spawner detaches the
//! child from the launcher's stdio and, on Unix, from its process group so a
//! hangup on the launching terminal does not reach the demo.

use std::process::{Command, Stdio};

use chrono::{DateTime, Local};
use log::debug;

use crate::error::{LaunchError, Result};
use crate::launcher::command::CommandSpec;

/// Reference to a started demo process. Holds no liveness guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: u32,
    pub command_line: String,
    pub started_at: DateTime<Local>,
}

/// Starts a process described by a [`CommandSpec`] without waiting for it.
pub trait ProcessSpawner {
    fn spawn(&mut self, spec: &CommandSpec) -> Result<ProcessHandle>;
}

/// Spawns real detached child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSpawner;

impl ProcessSpawner for DetachedSpawner {
    fn spawn(&mut self, spec: &CommandSpec) -> Result<ProcessHandle> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.current_dir)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn().map_err(|e| LaunchError::Spawn {
            program: spec.program.clone(),
            source: e,
        })?;

        debug!("Spawned pid {} in {}", child.id(), spec.current_dir.display());

        // Dropping the Child neither kills nor waits on the process.
        Ok(ProcessHandle {
            pid: child.id(),
            command_line: spec.shell_line(),
            started_at: Local::now(),
        })
    }
}
