//! # claude-vault
//!
//! Archive Claude conversational sessions as Markdown in an Obsidian-style
//! vault, with deterministic naming so repeated runs refresh instead of
//! duplicating.
//!
//! Three entry points, one pipeline:
//!
//! ```text
//! hook    stdin: one hook JSON object ──┐
//! import  stdin: JSONL file paths ──────┼──▶ group ▶ normalize ▶ render ▶ vault write
//! web     conversations.json export ────┘
//! ```
//!
//! Exit-code policy differs per entry point: `hook` always exits 0 (the
//! host application must never be blocked by a failed archive), while
//! `import` and `web` isolate failures per file/session and report them.

mod archive;
mod config;
mod content;
mod error;
mod grouper;
mod hook;
mod identity;
mod importer;
mod logfile;
mod markdown;
mod sessions;
mod vault;
mod webimport;

use chrono::Local;
use clap::{Parser, Subcommand};
use config::Config;
use logfile::ActivityLog;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "claude-vault", about = "Archive Claude sessions as Markdown in a vault")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stop-hook entry point: reads one hook JSON object from stdin
    Hook,
    /// Bulk import: reads JSONL history file paths from stdin, one per line
    Import,
    /// Import a claude.ai conversations.json export
    Web {
        /// Path to the export file
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("claude_vault=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let log = ActivityLog::new(config.log_path.clone());

    match cli.command {
        Command::Hook => {
            let input = match read_stdin() {
                Ok(input) => input,
                Err(e) => {
                    log.line(&format!("ERROR: Failed to read hook input: {}", e));
                    eprintln!("ERROR: Failed to read hook input: {}", e);
                    // hook invocations never fail the host
                    return ExitCode::SUCCESS;
                }
            };
            if let Err(e) = hook::run(&config, &log, &input, &Local) {
                log.line(&format!("ERROR: {}", e));
                eprintln!("ERROR: Failed to process and save transcript");
                eprintln!("  {}", e);
            }
            ExitCode::SUCCESS
        }
        Command::Import => {
            let input = match read_stdin() {
                Ok(input) => input,
                Err(e) => {
                    log.line(&format!("ERROR: Failed to read file list: {}", e));
                    eprintln!("Error reading file list: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            importer::run(&config, &log, &input, &Local);
            ExitCode::SUCCESS
        }
        Command::Web { file } => {
            let path = file.unwrap_or_else(default_conversations_path);
            match webimport::run(&config, &log, &path, &Local) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error processing conversations export: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn read_stdin() -> std::io::Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn default_conversations_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
    PathBuf::from(home).join("Downloads").join("conversations.json")
}
