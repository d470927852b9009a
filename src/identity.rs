//! Session identity: slug and timestamp derivation for deterministic naming.
//!
//! Timestamps in the history records are ISO-8601 UTC; everything a user
//! sees (filenames, the document date line, the web vault's year-month
//! partition) is in local time. Conversion functions are generic over the
//! time zone so production passes `chrono::Local` and tests pin a
//! `FixedOffset`.

use crate::content;
use crate::sessions::{Message, Source, Transcript};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;
use tracing::warn;

/// Fallback slug when no user message yields a usable name.
const FALLBACK_SLUG: &str = "session";

/// Maximum characters of the first line that feed the slug.
const SLUG_SOURCE_CHARS: usize = 30;

/// Normalize free text into a filename-safe slug: first line, first 30
/// characters, lowercased, every run of non-alphanumerics collapsed to a
/// single hyphen, hyphens trimmed at both ends. Empty results fall back to
/// `"session"`.
pub fn normalize_slug(text: &str) -> String {
    let unescaped = content::unescape(text);
    let first_line = unescaped.lines().next().unwrap_or("");
    let head: String = first_line.chars().take(SLUG_SOURCE_CHARS).collect();

    let mut slug = String::new();
    let mut gap = false;
    for c in head.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(c);
        } else {
            gap = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Derive the session slug from the first user message.
pub fn session_slug(messages: &[Message]) -> String {
    let Some(first_user) = messages.iter().find(|m| m.role == "user") else {
        return FALLBACK_SLUG.to_string();
    };
    normalize_slug(&content::plain_text(&first_user.content))
}

/// Parse an ISO-8601 timestamp as UTC. Accepts an explicit offset (`Z` or
/// `±HH:MM`) or a bare datetime, which is taken as UTC.
fn parse_utc(iso: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Convert an ISO-8601 UTC timestamp to the local `YYYYMMDD-HHMMSS` key
/// used in filenames and the web vault partition. Unparseable input is not
/// fatal; it resolves to `None`.
pub fn timestamp_key<Tz>(iso: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match parse_utc(iso) {
        Some(utc) => Some(utc.with_timezone(tz).format("%Y%m%d-%H%M%S").to_string()),
        None => {
            warn!("Failed to parse session timestamp: {}", iso);
            None
        }
    }
}

/// Resolve the session's canonical timestamp key. A precomputed
/// `_first_message_timestamp` (bulk-import fast path) is used verbatim;
/// otherwise the first message's timestamp is converted.
pub fn session_timestamp<Tz>(transcript: &Transcript, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if let Some(precomputed) = &transcript.first_message_timestamp {
        return Some(precomputed.clone());
    }
    let iso = transcript.messages.first()?.timestamp.as_deref()?;
    timestamp_key(iso, tz)
}

/// The document's date line: `YYYY-MM-DD HH:MM:SS ±HH:MM`, local time with
/// an explicit offset. `None` renders as `"Unknown"`.
pub fn date_line<Tz>(messages: &[Message], tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let iso = messages.first()?.timestamp.as_deref()?;
    let utc = parse_utc(iso);
    if utc.is_none() {
        warn!("Failed to parse session date: {}", iso);
    }
    utc.map(|dt| dt.with_timezone(tz).format("%Y-%m-%d %H:%M:%S %:z").to_string())
}

/// Assemble the destination filename.
///
/// - code: `{timestamp}_{slug}_{sessionId[0:8]}.md`
/// - web:  `{timestamp}_{project}_{slug}.md` (web sessions have no stable id)
pub fn filename(
    source: Source,
    timestamp: &str,
    slug: &str,
    session_id: &str,
    project: &str,
) -> String {
    match source {
        Source::Web => format!("{}_{}_{}.md", timestamp, project, slug),
        Source::Code => {
            let short_id: String = session_id.chars().take(8).collect();
            format!("{}_{}_{}.md", timestamp, slug, short_id)
        }
    }
}
