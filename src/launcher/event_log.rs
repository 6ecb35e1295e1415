//! Event Log
//!
//! Append-only record of launch attempts. Each attempt writes one line:
//!
//! ```text
//! Starting synth... [2018-04-18 09:00:01]
//! ```
//!
//! The file is never truncated or rotated.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::{LaunchError, Result};

/// Message recorded for every launch attempt.
pub const LAUNCH_MESSAGE: &str = "Starting synth...";

/// Timestamp format used inside the brackets.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single parsed log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchLogEntry {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

impl LaunchLogEntry {
    /// Render as `<message> [<timestamp>]`, without the newline.
    pub fn to_line(&self) -> String {
        format!(
            "{} [{}]",
            self.message,
            self.timestamp.format(TIMESTAMP_FORMAT)
        )
    }

    /// Parse a line written by [`LaunchLogEntry::to_line`].
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end();
        let body = line.strip_suffix(']')?;
        let open = body.rfind(" [")?;
        let timestamp = NaiveDateTime::parse_from_str(&body[open + 2..], TIMESTAMP_FORMAT).ok()?;
        Some(Self {
            timestamp,
            message: body[..open].to_string(),
        })
    }
}

/// Append-only launch log at a fixed path.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line. The line goes out in a single write so concurrent
    /// appenders cannot interleave inside it.
    pub fn record(&self, message: &str, timestamp: NaiveDateTime) -> Result<()> {
        let entry = LaunchLogEntry {
            timestamp,
            message: message.to_string(),
        };
        let line = format!("{}\n", entry.to_line());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;

        file.write_all(line.as_bytes())
            .map_err(|e| self.write_error(e))?;

        Ok(())
    }

    /// Record the standard launch message stamped with local time.
    pub fn record_launch(&self) -> Result<()> {
        self.record(LAUNCH_MESSAGE, chrono::Local::now().naive_local())
    }

    /// Read all well-formed entries, oldest first. A missing log is empty.
    /// Lines that are not UTF-8 or not in the launch format are skipped.
    pub fn entries(&self) -> Result<Vec<LaunchLogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read(&self.path)?;
        Ok(content
            .split(|&b| b == b'\n')
            .filter_map(|line| std::str::from_utf8(line).ok())
            .filter_map(LaunchLogEntry::parse)
            .collect())
    }

    fn write_error(&self, source: std::io::Error) -> LaunchError {
        LaunchError::LogWrite {
            path: self.path.clone(),
            source,
        }
    }
}
