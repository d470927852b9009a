//! Process configuration, resolved once at startup.
//!
//! Recognized environment variables (all optional):
//! - `CLAUDE_VAULT_PATH` - vault root for code-source sessions
//! - `CLAUDE_WEB_VAULT_PATH` - vault root for web-source sessions
//! - `CLAUDE_LOG_PATH` - append-only activity log
//! - `CLAUDE_VAULT_MODE=test` - suffix code-vault project dirs with " [test]"
//!
//! The resulting `Config` is passed by reference into the pipeline; no
//! component reads the environment after this point.

use std::path::PathBuf;

const DEFAULT_VAULT_ROOT: &str =
    "Library/Mobile Documents/iCloud~md~obsidian/Documents/ObsidianVault";

#[derive(Debug, Clone)]
pub struct Config {
    /// Destination root for Claude Code sessions.
    pub code_vault: PathBuf,
    /// Destination root for claude.ai web sessions.
    pub web_vault: PathBuf,
    /// Append-only activity log file.
    pub log_path: PathBuf,
    /// Test isolation: append " [test]" to code-vault project directories.
    pub test_mode: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        let home = PathBuf::from(home);

        let code_vault = std::env::var("CLAUDE_VAULT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(DEFAULT_VAULT_ROOT).join("Claude Code"));
        let web_vault = std::env::var("CLAUDE_WEB_VAULT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(DEFAULT_VAULT_ROOT).join("claude.ai"));
        let log_path = std::env::var("CLAUDE_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/var/log/claude-vault.log"));
        let test_mode = std::env::var("CLAUDE_VAULT_MODE")
            .map(|mode| mode == "test")
            .unwrap_or(false);

        Self {
            code_vault,
            web_vault,
            log_path,
            test_mode,
        }
    }
}
