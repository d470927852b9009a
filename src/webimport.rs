//! Import a claude.ai web export (`conversations.json`).
//!
//! The export is a single JSON array of conversations:
//!
//! ```json
//! [{"uuid":"...","name":"...","chat_messages":[
//!   {"sender":"human","content":[{"type":"text","text":"..."}],"created_at":"..."}]}]
//! ```
//!
//! Each conversation is adapted into the common transcript shape
//! (`sender: human` -> `role: user`) and archived as a web-source session.
//! Web sessions have no working directory and no stable short id: the
//! filename carries the slugified conversation name instead, and documents
//! are partitioned by local year-month.

use crate::archive::{self, ArchiveRequest};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logfile::ActivityLog;
use crate::sessions::{BlockValue, Message, MessageContent, Source, Transcript};
use crate::{identity, vault};
use serde::Deserialize;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::warn;

const PROGRESS_EVERY: usize = 10;

#[derive(Debug, Deserialize)]
struct Conversation {
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    chat_messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    sender: String,
    #[serde(default)]
    content: Vec<BlockValue>,
    created_at: Option<String>,
}

/// Import every conversation in the export file. Per-conversation failures
/// are logged and counted; a missing or malformed export file is fatal.
pub fn run<Tz>(config: &Config, log: &ActivityLog, path: &Path, tz: &Tz) -> Result<()>
where
    Tz: chrono::TimeZone,
    Tz::Offset: Display,
{
    println!("📁 Reading: {}", path.display());
    if !path.exists() {
        log.line(&format!("ERROR: Conversations export not found: {}", path.display()));
        return Err(Error::TranscriptNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let conversations: Vec<Conversation> = serde_json::from_str(&content).inspect_err(|e| {
        log.line(&format!("ERROR: Failed to parse conversations JSON: {}", e));
    })?;

    let mut imported = 0;
    let mut failed = 0;
    for (index, conversation) in conversations.iter().enumerate() {
        match import_conversation(config, log, conversation, tz) {
            Ok(Some(relative)) => {
                println!("{}", relative);
                imported += 1;
            }
            Ok(None) => {} // empty conversation, skipped
            Err(e) => {
                log.line(&format!("ERROR: Failed to process conversation: {}", e));
                log.json(&serde_json::json!({
                    "uuid": conversation.uuid,
                    "name": conversation.name,
                }));
                warn!("Failed to process conversation {}: {}", conversation.uuid, e);
                failed += 1;
            }
        }
        if (index + 1) % PROGRESS_EVERY == 0 {
            println!("  ... {}/{}", index + 1, conversations.len());
        }
    }

    if failed > 0 {
        println!(
            "✓ Web import completed: {} conversations processed ({} failed)",
            imported, failed
        );
    } else {
        println!("✓ Web import completed: {} conversations processed", imported);
    }
    log.line(&format!(
        "Web import completed: {} conversations processed, {} failed",
        imported, failed
    ));
    Ok(())
}

/// Archive a single conversation. Returns the vault-relative path, or
/// `None` when the conversation has no messages.
fn import_conversation<Tz>(
    config: &Config,
    log: &ActivityLog,
    conversation: &Conversation,
    tz: &Tz,
) -> Result<Option<String>>
where
    Tz: chrono::TimeZone,
    Tz::Offset: Display,
{
    let Some(transcript) = to_transcript(conversation, tz) else {
        return Ok(None);
    };
    let project = identity::normalize_slug(&conversation.name);
    let outcome = archive::archive_session(
        config,
        log,
        &ArchiveRequest {
            project: &project,
            cwd: vault::WEB_CWD,
            session_id: &conversation.uuid,
            source: Source::Web,
            transcript: &transcript,
        },
        tz,
    )?;
    log.line(&format!("Successfully imported transcript: {}", outcome.filename));
    Ok(Some(outcome.relative_path))
}

/// Map the export shape onto the common transcript shape. Conversations
/// with no messages yield `None`.
fn to_transcript<Tz>(conversation: &Conversation, tz: &Tz) -> Option<Transcript>
where
    Tz: chrono::TimeZone,
    Tz::Offset: Display,
{
    if conversation.chat_messages.is_empty() {
        return None;
    }

    let messages: Vec<Message> = conversation
        .chat_messages
        .iter()
        .map(|chat| Message {
            role: map_sender(&chat.sender),
            content: MessageContent::Blocks(chat.content.clone()),
            timestamp: chat.created_at.clone(),
            signature: false,
        })
        .collect();

    let first_message_timestamp = messages
        .first()
        .and_then(|m| m.timestamp.as_deref())
        .and_then(|iso| identity::timestamp_key(iso, tz));

    Some(Transcript {
        session_id: conversation.uuid.clone(),
        cwd: vault::WEB_CWD.to_string(),
        messages,
        first_message_timestamp,
    })
}

fn map_sender(sender: &str) -> String {
    if sender == "human" {
        "user".to_string()
    } else {
        sender.to_string()
    }
}
