//! Append-only activity log.
//!
//! One timestamped line per event, `[YYYY-MM-DD HH:MM:SS +ZZZZ] message`.
//! Multi-line messages and structured payloads are indented so a log entry
//! stays visually grouped when read back:
//!
//! ```text
//! [2025-11-03 23:30:22 +0900] Imported 3 sessions from history.jsonl
//! [2025-11-03 23:30:22 +0900] {
//!   "session_id": "abc",
//!   "cwd": "/work"
//! }
//! ```
//!
//! Logging must never break the pipeline: write failures go to stderr and
//! are otherwise swallowed.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one event line.
    pub fn line(&self, message: &str) {
        self.write_entry(&indent_continuation(message));
    }

    /// Append a structured payload, pretty-printed.
    pub fn json(&self, payload: &serde_json::Value) {
        let pretty = serde_json::to_string_pretty(payload)
            .unwrap_or_else(|_| payload.to_string());
        self.write_entry(&indent_continuation(&pretty));
    }

    fn write_entry(&self, message: &str) {
        if let Err(e) = self.try_write(message) {
            eprintln!("Failed to write log: {}", e);
        }
    }

    fn try_write(&self, message: &str) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S %z");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "[{}] {}", stamp, message)
    }
}

/// Indent every line after the first by two spaces.
fn indent_continuation(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("").to_string();
    lines.fold(first, |mut acc, line| {
        acc.push_str("\n  ");
        acc.push_str(line);
        acc
    })
}
