//! Destination resolution and file writes inside the vault.
//!
//! Code sessions land in `<code-vault>/<project>/`; web sessions are
//! partitioned by month, `<web-vault>/<YYYYMM>/` from the session's local
//! timestamp. Naming is deterministic, so an existing file at the target
//! path means a re-import: it is overwritten with a logged warning, never
//! treated as an error.

use crate::config::Config;
use crate::error::Result;
use crate::logfile::ActivityLog;
use crate::sessions::Source;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Placeholder working directory for web sessions, which have none; shows
/// up in the document's `**Path**` metadata line.
pub const WEB_CWD: &str = "claude.ai";

/// Fixed vault subdirectory names used in the vault-relative paths handed
/// back to bulk-import callers.
fn vault_subdir(source: Source) -> &'static str {
    match source {
        Source::Code => "Claude Code",
        Source::Web => "claude.ai",
    }
}

/// Compute the directory component under the vault root: the project name
/// for code sessions (suffixed in test mode), the `YYYYMM` of the local
/// session timestamp for web sessions (project name when no timestamp
/// resolves).
pub fn dir_component(
    config: &Config,
    source: Source,
    project: &str,
    timestamp: Option<&str>,
) -> String {
    match source {
        Source::Web => match timestamp.map(year_month) {
            Some(Some(month)) => month,
            _ => project.to_string(),
        },
        Source::Code if config.test_mode => format!("{} [test]", project),
        Source::Code => project.to_string(),
    }
}

/// First six characters of a timestamp key. Counted in chars, not bytes:
/// an injected `_first_message_timestamp` arrives verbatim from the hook
/// payload and is not guaranteed to be ASCII.
fn year_month(timestamp: &str) -> Option<String> {
    let month: String = timestamp.chars().take(6).collect();
    (month.chars().count() == 6).then_some(month)
}

/// Ensure the destination directory exists and return its absolute path.
/// Creation is idempotent; failure propagates.
pub fn ensure_dir(
    config: &Config,
    log: &ActivityLog,
    source: Source,
    component: &str,
) -> Result<PathBuf> {
    let root = match source {
        Source::Code => &config.code_vault,
        Source::Web => &config.web_vault,
    };
    let dir = root.join(component);
    fs::create_dir_all(&dir).inspect_err(|e| {
        log.line(&format!("ERROR: Failed to create directory {}: {}", dir.display(), e));
    })?;
    log.line(&format!("Ensured directory exists: {}", dir.display()));
    Ok(dir)
}

/// Write the rendered document. Overwriting is expected for re-imports and
/// logged as a warning; write failures propagate.
pub fn save_markdown(
    log: &ActivityLog,
    dir: &Path,
    filename: &str,
    markdown: &str,
) -> Result<PathBuf> {
    let path = dir.join(filename);
    if path.exists() {
        warn!("Overwriting existing file: {}", path.display());
        log.line(&format!("WARNING: Overwriting existing file: {}", path.display()));
    }
    fs::write(&path, markdown).inspect_err(|e| {
        log.line(&format!("ERROR: Failed to save file {}: {}", path.display(), e));
    })?;
    log.line(&format!("Saved markdown to: {}", path.display()));
    debug!("Saved markdown to {}", path.display());
    Ok(path)
}

/// The vault-relative path tracked by bulk-import callers, e.g.
/// `Claude Code/my-project/20251103-143022_fix-bug_abc12345.md`.
pub fn relative_path(source: Source, component: &str, filename: &str) -> String {
    format!("{}/{}/{}", vault_subdir(source), component, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &std::path::Path, test_mode: bool) -> Config {
        Config {
            code_vault: root.join("Claude Code"),
            web_vault: root.join("claude.ai"),
            log_path: root.join("activity.log"),
            test_mode,
        }
    }

    #[test]
    fn test_dir_component_code() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path(), false);
        assert_eq!(dir_component(&cfg, Source::Code, "my-project", None), "my-project");
    }

    #[test]
    fn test_dir_component_code_test_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path(), true);
        assert_eq!(
            dir_component(&cfg, Source::Code, "my-project", Some("20251103-233022")),
            "my-project [test]"
        );
    }

    #[test]
    fn test_dir_component_web_uses_year_month() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path(), false);
        assert_eq!(
            dir_component(&cfg, Source::Web, "proj", Some("20251103-233022")),
            "202511"
        );
    }

    #[test]
    fn test_dir_component_web_tolerates_non_ascii_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path(), false);
        // injected timestamps come verbatim from the payload; a multi-byte
        // char straddling the cutoff must not panic
        assert_eq!(
            dir_component(&cfg, Source::Web, "proj", Some("12345é-000000")),
            "12345é"
        );
        // too short to carry a year-month falls back to the project name
        assert_eq!(dir_component(&cfg, Source::Web, "proj", Some("2025")), "proj");
    }

    #[test]
    fn test_dir_component_web_falls_back_to_project() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path(), false);
        assert_eq!(dir_component(&cfg, Source::Web, "proj", None), "proj");
    }

    #[test]
    fn test_ensure_dir_creates_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path(), false);
        let log = ActivityLog::new(cfg.log_path.clone());

        let dir = ensure_dir(&cfg, &log, Source::Code, "my-project").unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir, tmp.path().join("Claude Code").join("my-project"));
        // second call is a no-op
        let again = ensure_dir(&cfg, &log, Source::Code, "my-project").unwrap();
        assert_eq!(dir, again);
    }

    #[test]
    fn test_save_markdown_overwrites_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path(), false);
        let log = ActivityLog::new(cfg.log_path.clone());
        let dir = ensure_dir(&cfg, &log, Source::Code, "p").unwrap();

        let path = save_markdown(&log, &dir, "doc.md", "first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        let path = save_markdown(&log, &dir, "doc.md", "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        let activity = fs::read_to_string(&cfg.log_path).unwrap();
        assert!(activity.contains("WARNING: Overwriting existing file"));
    }

    #[test]
    fn test_relative_path_shapes() {
        assert_eq!(
            relative_path(Source::Code, "my-project", "a.md"),
            "Claude Code/my-project/a.md"
        );
        assert_eq!(
            relative_path(Source::Web, "202511", "b.md"),
            "claude.ai/202511/b.md"
        );
    }
}
