//! Error taxonomy for the archiving pipeline.
//!
//! - Malformed structured input (hook JSON, transcript JSON, a JSONL line,
//!   the conversations export) is `Json`; the unit it belongs to is skipped
//!   by the caller.
//! - Missing input files are `TranscriptNotFound`; skipped with a warning.
//! - Write/IO failures are `Io` and propagate — silently losing an archive
//!   write is unacceptable.
//!
//! Malformed timestamps are deliberately absent: they never fail, they
//! resolve to `None` and a documented fallback.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("transcript file not found: {0}")]
    TranscriptNotFound(PathBuf),

    #[error("hook input is missing required field `{0}`")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
