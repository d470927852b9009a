//! Content normalization: raw message content -> renderable Markdown body.
//!
//! Two views of the same content:
//! - `render` produces the full body for the document, expanding typed
//!   blocks into emoji-labeled sub-sections
//! - `plain_text` produces the flattened text used for slug derivation
//!
//! Both are total: unknown or unsupported shapes are dropped, never errors.

use crate::sessions::{BlockValue, ContentBlock, MessageContent};

/// Convert escaped two-character `\n` sequences into real newlines.
/// History records carry message text with literal backslash-n.
pub fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Render message content as the body of a `## User` / `## Claude` section.
///
/// Plain strings pass through (unescaped). Block lists become one labeled
/// sub-section per recognized block, in order:
///
/// ```text
/// ### 💭 Thinking
///
/// <thinking text>
///
/// ### 💬 Response
///
/// <text>
/// ```
///
/// Bare strings, `signature` blocks, and unrecognized shapes are skipped
/// silently.
pub fn render(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => unescape(text),
        MessageContent::Blocks(blocks) => render_blocks(blocks),
    }
}

/// Flatten content to plain text for name derivation: bare strings and
/// `text` blocks joined by a single space, everything else ignored.
pub fn plain_text(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Blocks(blocks) => blocks
            .iter()
            .filter_map(|value| match value {
                BlockValue::Raw(text) => Some(text.as_str()),
                BlockValue::Block(ContentBlock::Text { text }) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn render_blocks(blocks: &[BlockValue]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for value in blocks {
        let BlockValue::Block(block) = value else {
            continue;
        };
        let (emoji, label, text) = match block {
            ContentBlock::Text { text } => ("💬", "Response", text),
            ContentBlock::Thinking { thinking } => ("💭", "Thinking", thinking),
            ContentBlock::Input { text } => ("⌨️", "Input", text),
        };
        lines.push(format!("### {} {}", emoji, label));
        lines.push(String::new());
        lines.push(unescape(text));
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(json: &str) -> MessageContent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_unescape_literal_newlines() {
        assert_eq!(unescape("line one\\nline two"), "line one\nline two");
        assert_eq!(unescape("no escapes"), "no escapes");
    }

    #[test]
    fn test_render_plain_string() {
        let content = MessageContent::Text("hello\\nworld".to_string());
        assert_eq!(render(&content), "hello\nworld");
    }

    #[test]
    fn test_render_block_list_in_order() {
        let content = blocks(
            r#"[{"type":"thinking","thinking":"A\\nB"},{"type":"text","text":"C"}]"#,
        );
        let rendered = render(&content);
        assert_eq!(
            rendered,
            "### 💭 Thinking\n\nA\nB\n\n### 💬 Response\n\nC\n"
        );
        // thinking block precedes the response block
        assert!(rendered.find("Thinking").unwrap() < rendered.find("Response").unwrap());
    }

    #[test]
    fn test_render_drops_signature_and_unknown_blocks() {
        let content = blocks(
            r#"[{"type":"signature","signature":"SECRET-SIG"},
               {"type":"tool_use","name":"bash"},
               {"type":"text","text":"visible"}]"#,
        );
        let rendered = render(&content);
        assert!(!rendered.contains("SECRET-SIG"));
        assert!(!rendered.contains("bash"));
        assert!(rendered.contains("visible"));
    }

    #[test]
    fn test_render_skips_bare_strings() {
        let content = blocks(r#"["raw fragment",{"type":"text","text":"typed"}]"#);
        let rendered = render(&content);
        assert!(!rendered.contains("raw fragment"));
        assert!(rendered.contains("typed"));
    }

    #[test]
    fn test_render_input_block() {
        let content = blocks(r#"[{"type":"input","text":"ls -la"}]"#);
        assert_eq!(render(&content), "### ⌨️ Input\n\nls -la\n");
    }

    #[test]
    fn test_plain_text_joins_strings_and_text_blocks() {
        let content = blocks(
            r#"["first",{"type":"text","text":"second"},{"type":"thinking","thinking":"skip"}]"#,
        );
        assert_eq!(plain_text(&content), "first second");
    }

    #[test]
    fn test_plain_text_of_string_content() {
        let content = MessageContent::Text("just text".to_string());
        assert_eq!(plain_text(&content), "just text");
    }
}
