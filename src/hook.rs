//! Stop-hook entry point.
//!
//! Claude Code invokes the hook with one JSON object on stdin. Bulk drivers
//! reuse the same shape with the transcript embedded directly; the
//! interactive hook passes a `transcript_path` to load instead.
//!
//! The CLI adapter around `run` always exits 0: a failed archive must never
//! block the host application, so errors are logged and swallowed one level
//! up (see `main.rs`).

use crate::archive::{self, ArchiveRequest};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logfile::ActivityLog;
use crate::sessions::{Source, Transcript};
use serde::Deserialize;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct HookInput {
    pub session_id: Option<String>,
    pub cwd: Option<String>,
    /// Embedded transcript (bulk import) wins over `transcript_path`.
    pub transcript: Option<Transcript>,
    pub transcript_path: Option<PathBuf>,
    #[serde(default)]
    pub source: Source,
    pub project: Option<String>,
}

/// Process one hook invocation: parse stdin JSON, obtain the transcript,
/// archive it, log the result.
pub fn run<Tz>(config: &Config, log: &ActivityLog, input: &str, tz: &Tz) -> Result<()>
where
    Tz: chrono::TimeZone,
    Tz::Offset: Display,
{
    let hook: HookInput = serde_json::from_str(input).inspect_err(|e| {
        log.line(&format!("ERROR: Failed to parse hook input JSON: {}", e));
        let snippet: String = input.chars().take(200).collect();
        eprintln!("ERROR: Invalid hook input JSON");
        eprintln!("  Input (first 200 chars): {:?}", snippet);
    })?;

    let transcript = match hook.transcript {
        Some(t) => t,
        None => {
            let path = hook
                .transcript_path
                .as_deref()
                .ok_or(Error::MissingField("transcript_path"))?;
            load_transcript(log, path)?
        }
    };

    let cwd = hook.cwd.ok_or(Error::MissingField("cwd"))?;
    let session_id = hook.session_id.ok_or(Error::MissingField("session_id"))?;
    let project = hook
        .project
        .clone()
        .unwrap_or_else(|| project_from_cwd(&cwd));

    let outcome = archive::archive_session(
        config,
        log,
        &ArchiveRequest {
            project: &project,
            cwd: &cwd,
            session_id: &session_id,
            source: hook.source,
            transcript: &transcript,
        },
        tz,
    )?;
    log.line(&format!("Successfully saved transcript: {}", outcome.filename));
    Ok(())
}

/// Load and parse a transcript JSON file referenced by the hook payload.
pub fn load_transcript(log: &ActivityLog, path: &Path) -> Result<Transcript> {
    if !path.exists() {
        log.line(&format!("WARNING: Transcript file not found: {}", path.display()));
        warn!("Transcript file not found: {}", path.display());
        return Err(Error::TranscriptNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .inspect_err(|e| {
            log.line(&format!("ERROR: Failed to parse transcript JSON: {}", e));
        })
        .map_err(Error::from)
}

/// Default project name: the last component of the working directory.
pub fn project_from_cwd(cwd: &str) -> String {
    Path::new(cwd)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(cwd)
        .to_string()
}
