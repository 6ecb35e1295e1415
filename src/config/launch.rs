//! Launch Configuration
//!
//! The fixed set of parameters handed to the demo process: how many notes
//! to transpose the melody sample into, and the four WAV samples it plays.

use std::path::{Path, PathBuf};

use hound::WavReader;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{LaunchError, Result};

/// Default number of transposed melody notes.
pub const DEFAULT_SAMPLE_COUNT: u32 = 20;

/// Default melody sample.
pub const DEFAULT_MELODY_WAV: &str = "c64-lead1.wav";

/// Default drone sample.
pub const DEFAULT_DRONE_WAV: &str = "minimoog-bass.wav";

/// Default kick drum sample.
pub const DEFAULT_KICK_WAV: &str = "kick.wav";

/// Default snare drum sample.
pub const DEFAULT_SNARE_WAV: &str = "snare.wav";

/// Immutable launch parameters consumed by exactly one demo invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfiguration {
    /// Number of notes the melody sample is transposed into (`-n`).
    pub sample_count: u32,

    /// Melody sample (`-wm`).
    pub melody_wav: PathBuf,

    /// Drone sample (`-wd`).
    pub drone_wav: PathBuf,

    /// Kick drum sample (`-wk`).
    pub kick_wav: PathBuf,

    /// Snare drum sample (`-ws`).
    pub snare_wav: PathBuf,

    /// Keyboard layout file mapping keys to notes (`-k`). The demo falls
    /// back to its own default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<PathBuf>,

    /// Ask the demo to print its library warnings (`-v`).
    pub verbose: bool,
}

impl Default for LaunchConfiguration {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            melody_wav: PathBuf::from(DEFAULT_MELODY_WAV),
            drone_wav: PathBuf::from(DEFAULT_DRONE_WAV),
            kick_wav: PathBuf::from(DEFAULT_KICK_WAV),
            snare_wav: PathBuf::from(DEFAULT_SNARE_WAV),
            keyboard: None,
            verbose: false,
        }
    }
}

impl LaunchConfiguration {
    /// The four WAV samples paired with their role, in command-line order.
    pub fn samples(&self) -> [(&'static str, &Path); 4] {
        [
            ("melody", self.melody_wav.as_path()),
            ("drone", self.drone_wav.as_path()),
            ("kick", self.kick_wav.as_path()),
            ("snare", self.snare_wav.as_path()),
        ]
    }

    /// Check the configuration before anything is spawned.
    ///
    /// Relative sample paths are resolved against `demo_root`, which is the
    /// directory the demo process will run in.
    ///
    /// # Errors
    /// * `Configuration` - if `sample_count` is zero
    /// * `SampleNotFound` - if a sample or the keyboard file does not exist
    /// * `InvalidSample` - if a sample is not a readable WAV file
    pub fn validate(&self, demo_root: &Path) -> Result<()> {
        if self.sample_count == 0 {
            return Err(LaunchError::Configuration {
                reason: "sample count must be a positive integer".to_string(),
            });
        }

        for (role, path) in self.samples() {
            let resolved = resolve(demo_root, path);
            validate_sample(&resolved)?;
            debug!("{} sample ok: {}", role, resolved.display());
        }

        if let Some(keyboard) = &self.keyboard {
            let resolved = resolve(demo_root, keyboard);
            if !resolved.is_file() {
                return Err(LaunchError::SampleNotFound { path: resolved });
            }
        }

        Ok(())
    }
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Confirm a sample exists and carries a parseable WAV header.
fn validate_sample(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(LaunchError::SampleNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| LaunchError::InvalidSample {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if reader.spec().channels == 0 {
        return Err(LaunchError::InvalidSample {
            path: path.to_path_buf(),
            reason: "no audio channels".to_string(),
        });
    }

    Ok(())
}
