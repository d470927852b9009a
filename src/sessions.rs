//! Shared session types for transcript archiving.
//!
//! This module defines the normalized transcript shape that every entry point
//! (Stop hook, JSONL bulk import, claude.ai web export) converges on before
//! rendering: a session id, the working directory it ran in, and an ordered
//! list of messages. Message content is heterogeneous in the wild (plain
//! string, list of typed blocks, list of bare strings) and is modeled here as
//! tagged/untagged enums so downstream code matches exhaustively instead of
//! duck-typing.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// Which producing system a session came from. Determines the document
/// header, filename shape, and vault partitioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Code,
    Web,
}

/// A single message within a session, in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Trace marker. A truthy `signature` field means the message carries no
    /// user-visible content and is excluded from rendering entirely.
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "is_false")]
    pub signature: bool,
}

/// Message content: either a plain string or a list of block-like values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<BlockValue>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

/// One element of a block-list content value. Real exports mix structured
/// blocks with bare strings; anything else is preserved but ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockValue {
    Raw(String),
    Block(ContentBlock),
    Ignored(serde_json::Value),
}

/// A recognized, renderable content block. Unrecognized types (including
/// `signature`) fail the tagged match and land in `BlockValue::Ignored`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "thinking")]
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    #[serde(rename = "input")]
    Input {
        #[serde(default)]
        text: String,
    },
}

/// A complete session transcript: the unit the pipeline archives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Precomputed local timestamp key (`YYYYMMDD-HHMMSS`), injected by bulk
    /// importers. Takes precedence over deriving from `messages[0]`.
    #[serde(
        rename = "_first_message_timestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub first_message_timestamp: Option<String>,
}

/// JSON truthiness for the `signature` marker: absent, `null`, and `false`
/// are falsy; every other value (strings, objects, `true`) is truthy.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(!matches!(
        value,
        None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false))
    ))
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_deserializes_plain_string() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"user","content":"hello"}"#).unwrap();
        assert!(matches!(msg.content, MessageContent::Text(ref t) if t == "hello"));
        assert!(!msg.signature);
    }

    #[test]
    fn test_content_deserializes_block_list() {
        let msg: Message = serde_json::from_str(
            r#"{"role":"assistant","content":[
                {"type":"thinking","thinking":"hmm"},
                {"type":"text","text":"answer"},
                {"type":"signature","signature":"abc"},
                "bare string"
            ]}"#,
        )
        .unwrap();
        let MessageContent::Blocks(blocks) = msg.content else {
            panic!("expected block list");
        };
        assert_eq!(blocks.len(), 4);
        assert!(matches!(blocks[0], BlockValue::Block(ContentBlock::Thinking { .. })));
        assert!(matches!(blocks[1], BlockValue::Block(ContentBlock::Text { .. })));
        assert!(matches!(blocks[2], BlockValue::Ignored(_)));
        assert!(matches!(blocks[3], BlockValue::Raw(_)));
    }

    #[test]
    fn test_signature_truthiness() {
        let truthy_values = [r#""sig-data""#, "true", "{}", "1"];
        for v in truthy_values {
            let msg: Message = serde_json::from_str(&format!(
                r#"{{"role":"assistant","content":"x","signature":{v}}}"#
            ))
            .unwrap();
            assert!(msg.signature, "value {v} should be truthy");
        }
        let falsy_values = ["null", "false"];
        for v in falsy_values {
            let msg: Message = serde_json::from_str(&format!(
                r#"{{"role":"assistant","content":"x","signature":{v}}}"#
            ))
            .unwrap();
            assert!(!msg.signature, "value {v} should be falsy");
        }
    }

    #[test]
    fn test_transcript_first_message_timestamp_field() {
        let t: Transcript = serde_json::from_str(
            r#"{"session_id":"abc","cwd":"/p","messages":[],"_first_message_timestamp":"20251103-143022"}"#,
        )
        .unwrap();
        assert_eq!(t.first_message_timestamp.as_deref(), Some("20251103-143022"));
    }
}
