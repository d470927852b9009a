//! Bulk import of Claude Code JSONL history files.
//!
//! The driver reads one file path per line from stdin, groups each file's
//! records into sessions, and archives every session. Failure isolation is
//! the point: a missing file, a malformed file, or one poison session must
//! never abort the rest of the batch.

use crate::archive::{self, ArchiveRequest};
use crate::config::Config;
use crate::error::Result;
use crate::logfile::ActivityLog;
use crate::sessions::Source;
use crate::{grouper, hook, identity};
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Import every JSONL file listed in `input` (one path per line).
pub fn run<Tz>(config: &Config, log: &ActivityLog, input: &str, tz: &Tz)
where
    Tz: chrono::TimeZone,
    Tz::Offset: Display,
{
    let paths: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if paths.is_empty() {
        log.line("No JSONL files to process");
        return;
    }

    for path in paths {
        if let Err(e) = import_file(config, log, Path::new(path), tz) {
            log.line(&format!("ERROR: Failed to import {}: {}", path, e));
            warn!("Failed to import {}: {}", path, e);
        }
    }
}

/// Import one history file. Returns the number of sessions archived.
/// Per-session failures are logged and skipped; a structurally broken file
/// fails as a whole.
pub fn import_file<Tz>(
    config: &Config,
    log: &ActivityLog,
    path: &Path,
    tz: &Tz,
) -> Result<usize>
where
    Tz: chrono::TimeZone,
    Tz::Offset: Display,
{
    if !path.exists() {
        log.line(&format!("WARNING: JSONL file not found: {}", path.display()));
        eprintln!("File not found: {}", path.display());
        return Ok(0);
    }

    let content = fs::read_to_string(path)?;
    let sessions = grouper::group_sessions(&content)?;

    let mut imported = 0;
    for (session_id, mut transcript) in sessions {
        // Pin the filename timestamp before archiving so re-imports of the
        // same history are byte-identical.
        transcript.first_message_timestamp = transcript
            .messages
            .first()
            .and_then(|m| m.timestamp.as_deref())
            .and_then(|iso| identity::timestamp_key(iso, tz));

        let project = hook::project_from_cwd(&transcript.cwd);
        let result = archive::archive_session(
            config,
            log,
            &ArchiveRequest {
                project: &project,
                cwd: &transcript.cwd,
                session_id: &session_id,
                source: Source::Code,
                transcript: &transcript,
            },
            tz,
        );
        match result {
            Ok(outcome) => {
                log.line(&format!("Successfully imported transcript: {}", outcome.filename));
                debug!("Wrote {}", outcome.path.display());
                println!("{}", outcome.relative_path);
                imported += 1;
            }
            Err(e) => {
                log.line(&format!("ERROR: Failed to process session {}: {}", session_id, e));
                warn!("Failed to process session {}: {}", session_id, e);
            }
        }
    }

    log.line(&format!("Imported {} sessions from {}", imported, path.display()));
    Ok(imported)
}
