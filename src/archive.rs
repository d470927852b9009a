//! The per-session pipeline: transcript in, Markdown file in the vault out.
//!
//! This is the "library call" entry point used by every driver. Unlike the
//! hook adapter it propagates failures, so bulk importers can count them
//! per session while the batch continues.

use crate::config::Config;
use crate::error::Result;
use crate::logfile::ActivityLog;
use crate::markdown::{self, DocumentMeta};
use crate::sessions::{Source, Transcript};
use crate::{identity, vault};
use chrono::{TimeZone, Utc};
use std::fmt::Display;
use std::path::PathBuf;

/// One session to archive.
pub struct ArchiveRequest<'a> {
    pub project: &'a str,
    pub cwd: &'a str,
    pub session_id: &'a str,
    pub source: Source,
    pub transcript: &'a Transcript,
}

/// Where the session ended up.
pub struct ArchiveOutcome {
    pub filename: String,
    pub path: PathBuf,
    /// Vault-relative location, e.g. `claude.ai/202511/<filename>`.
    pub relative_path: String,
}

/// Derive identity, render, resolve, write. Deterministic for a given
/// transcript: the wall clock is consulted only when the session has no
/// resolvable timestamp at all.
pub fn archive_session<Tz>(
    config: &Config,
    log: &ActivityLog,
    request: &ArchiveRequest,
    tz: &Tz,
) -> Result<ArchiveOutcome>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let messages = &request.transcript.messages;
    let slug = identity::session_slug(messages);
    let date = identity::date_line(messages, tz);

    let markdown = markdown::render(
        &DocumentMeta {
            project: request.project,
            cwd: request.cwd,
            session_id: request.session_id,
            source: request.source,
            date: date.as_deref(),
        },
        messages,
    );

    let session_ts = identity::session_timestamp(request.transcript, tz);
    let component = vault::dir_component(config, request.source, request.project, session_ts.as_deref());
    let dir = vault::ensure_dir(config, log, request.source, &component)?;

    let timestamp = session_ts
        .unwrap_or_else(|| Utc::now().with_timezone(tz).format("%Y%m%d-%H%M%S").to_string());
    let filename = identity::filename(
        request.source,
        &timestamp,
        &slug,
        request.session_id,
        request.project,
    );

    let path = vault::save_markdown(log, &dir, &filename, &markdown)?;
    let relative_path = vault::relative_path(request.source, &component, &filename);

    Ok(ArchiveOutcome {
        filename,
        path,
        relative_path,
    })
}
