//! Group flat JSONL history records into per-session transcripts.
//!
//! Claude Code history files are one JSON object per line:
//!
//! ```json
//! {"sessionId":"...","cwd":"/work","message":{"role":"user","content":"..."},"timestamp":"..."}
//! ```
//!
//! Records are folded into an insertion-ordered map keyed by session id.
//! The first record for an id fixes that session's cwd; later records only
//! append messages. Records missing any of `sessionId`/`cwd`/`message` are
//! discarded silently; a structurally malformed line fails the whole call
//! and the caller decides whether to skip the file.

use crate::error::Result;
use crate::sessions::{Message, MessageContent, Transcript};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

/// One line of a history JSONL file, fields all optional.
#[derive(Debug, Deserialize)]
struct HistoryRecord {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
    cwd: Option<String>,
    message: Option<RecordMessage>,
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordMessage {
    #[serde(default)]
    role: String,
    content: Option<MessageContent>,
}

/// Fold JSONL text into transcripts, keyed by session id in first-seen
/// order. Empty input yields an empty map.
pub fn group_sessions(input: &str) -> Result<IndexMap<String, Transcript>> {
    let mut sessions: IndexMap<String, Transcript> = IndexMap::new();

    for line in input.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let record: HistoryRecord = serde_json::from_str(line)?;

        let (Some(session_id), Some(cwd), Some(message)) =
            (record.session_id, record.cwd, record.message)
        else {
            debug!("Discarding history record with missing fields");
            continue;
        };

        let transcript = sessions.entry(session_id.clone()).or_insert_with(|| Transcript {
            session_id,
            cwd,
            messages: Vec::new(),
            first_message_timestamp: None,
        });
        transcript.messages.push(Message {
            role: message.role,
            content: message.content.unwrap_or_default(),
            timestamp: record.timestamp,
            signature: false,
        });
    }

    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"sessionId":"session-001","cwd":"/test/project","message":{"role":"user","content":"Test message"},"timestamp":"2025-11-03T10:00:00.000Z"}
{"sessionId":"session-001","cwd":"/test/project","message":{"role":"assistant","content":"Response"},"timestamp":"2025-11-03T10:00:05.000Z"}
{"sessionId":"session-002","cwd":"/test/project","message":{"role":"user","content":"Another session"},"timestamp":"2025-11-03T11:00:00.000Z"}"#;

    #[test]
    fn test_groups_by_session_id_in_first_seen_order() {
        let sessions = group_sessions(SAMPLE).unwrap();
        assert_eq!(sessions.len(), 2);
        let ids: Vec<&String> = sessions.keys().collect();
        assert_eq!(ids, ["session-001", "session-002"]);

        let first = &sessions["session-001"];
        assert_eq!(first.messages.len(), 2);
        assert_eq!(first.cwd, "/test/project");
        assert_eq!(first.messages[0].role, "user");
        assert_eq!(first.messages[1].role, "assistant");
        assert_eq!(
            first.messages[0].timestamp.as_deref(),
            Some("2025-11-03T10:00:00.000Z")
        );

        assert_eq!(sessions["session-002"].messages.len(), 1);
    }

    #[test]
    fn test_first_record_fixes_cwd() {
        let input = r#"{"sessionId":"s","cwd":"/first","message":{"role":"user","content":"a"}}
{"sessionId":"s","cwd":"/second","message":{"role":"user","content":"b"}}"#;
        let sessions = group_sessions(input).unwrap();
        assert_eq!(sessions["s"].cwd, "/first");
        assert_eq!(sessions["s"].messages.len(), 2);
    }

    #[test]
    fn test_records_missing_fields_are_discarded() {
        let input = r#"{"cwd":"/p","message":{"role":"user","content":"no session id"}}
{"sessionId":"s","message":{"role":"user","content":"no cwd"}}
{"sessionId":"s","cwd":"/p"}
{"sessionId":"s","cwd":"/p","message":{"role":"user","content":"kept"}}"#;
        let sessions = group_sessions(input).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions["s"].messages.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        assert!(group_sessions("").unwrap().is_empty());
        assert!(group_sessions("\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_line_fails_the_call() {
        let input = r#"{"sessionId":"s","cwd":"/p","message":{"role":"user","content":"ok"}}
{not valid json}"#;
        assert!(group_sessions(input).is_err());
    }
}
