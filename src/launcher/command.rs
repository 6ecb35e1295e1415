//! Demo command construction.
//!
//! The argument list is a pure function of the [`LaunchConfiguration`], so
//! the same configuration always produces the same command line.

use std::path::PathBuf;

use crate::config::launch::resolve;
use crate::config::{LaunchConfiguration, LauncherSettings};
use crate::launcher::display::DisplayTarget;

/// A fully resolved process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Variables added to the child's inherited environment.
    pub env: Vec<(String, String)>,
    pub current_dir: PathBuf,
}

impl CommandSpec {
    /// Build the demo invocation from launcher settings.
    ///
    /// With an interpreter configured the executable becomes its first
    /// argument, e.g. `python3 synth.py -n 20 ...`, and is found relative to
    /// the working directory. Without one the executable is resolved against
    /// the demo root so it is not looked up on `PATH`.
    pub fn for_demo(
        settings: &LauncherSettings,
        config: &LaunchConfiguration,
        display: &DisplayTarget,
    ) -> Self {
        let (program, mut args) = match &settings.interpreter {
            Some(interpreter) => (
                interpreter.clone(),
                vec![settings.executable.to_string_lossy().into_owned()],
            ),
            None => (
                resolve(&settings.demo_root, &settings.executable)
                    .to_string_lossy()
                    .into_owned(),
                Vec::new(),
            ),
        };
        args.extend(demo_args(config));

        Self {
            program,
            args,
            env: vec![display.env_pair()],
            current_dir: settings.demo_root.clone(),
        }
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Shell-quoted command line, safe to hand to `sh -c`.
    pub fn shell_line(&self) -> String {
        shlex::try_join(self.argv()).unwrap_or_else(|_| {
            // Only NUL bytes fail to quote; fall back to naive joining.
            self.argv().join(" ")
        })
    }
}

/// Arguments for the demo in its fixed flag order.
pub fn demo_args(config: &LaunchConfiguration) -> Vec<String> {
    let mut args = vec![
        "-n".to_string(),
        config.sample_count.to_string(),
        "-wm".to_string(),
        config.melody_wav.to_string_lossy().into_owned(),
        "-wd".to_string(),
        config.drone_wav.to_string_lossy().into_owned(),
        "-wk".to_string(),
        config.kick_wav.to_string_lossy().into_owned(),
        "-ws".to_string(),
        config.snare_wav.to_string_lossy().into_owned(),
    ];

    if let Some(keyboard) = &config.keyboard {
        args.push("-k".to_string());
        args.push(keyboard.to_string_lossy().into_owned());
    }
    if config.verbose {
        args.push("-v".to_string());
    }

    args
}
