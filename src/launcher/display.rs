//! Display target for the demo process.

use crate::error::{LaunchError, Result};

/// Environment variable selecting the demo's graphical output.
pub const DISPLAY_VAR: &str = "DISPLAY";

/// A non-empty display identifier such as `:0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTarget(String);

impl DisplayTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The entry to place in the child's environment map.
    pub fn env_pair(&self) -> (String, String) {
        (DISPLAY_VAR.to_string(), self.0.clone())
    }
}

/// Build the display target for the demo. Only emptiness is checked; a bad
/// identifier surfaces when the demo fails to open its window.
pub fn configure_display(target: &str) -> Result<DisplayTarget> {
    let target = target.trim();
    if target.is_empty() {
        return Err(LaunchError::Environment {
            reason: "display target must not be empty".to_string(),
        });
    }
    Ok(DisplayTarget(target.to_string()))
}
