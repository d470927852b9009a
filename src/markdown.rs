//! Render a session transcript as one canonical Markdown document.
//!
//! Rendering is a pure function of its inputs; the date line is resolved by
//! the caller so repeated renders of the same transcript are byte-identical.

use crate::content;
use crate::sessions::{Message, Source};

/// Everything the renderer needs to know about a session.
pub struct DocumentMeta<'a> {
    pub project: &'a str,
    pub cwd: &'a str,
    pub session_id: &'a str,
    pub source: Source,
    /// Resolved local date line; `None` renders as "Unknown".
    pub date: Option<&'a str>,
}

pub fn render(meta: &DocumentMeta, messages: &[Message]) -> String {
    let header = match meta.source {
        Source::Code => "Claude Code Session",
        Source::Web => "Claude Web Session",
    };

    let mut out: Vec<String> = Vec::new();
    out.push(format!("# {}", header));
    out.push(String::new());
    out.push(format!("**Project**: {}", meta.project));
    out.push(format!("**Path**: {}", meta.cwd));
    out.push(format!("**Session ID**: {}", meta.session_id));
    out.push(format!("**Date**: {}", meta.date.unwrap_or("Unknown")));
    out.push(String::new());
    out.push("---".to_string());
    out.push(String::new());

    for message in messages {
        if message.signature {
            continue;
        }
        let heading = match message.role.as_str() {
            "user" => "## 👤 User",
            "assistant" => "## 🤖 Claude",
            _ => continue,
        };
        out.push(heading.to_string());
        out.push(String::new());
        out.push(content::render(&message.content));
        out.push(String::new());
        out.push("---".to_string());
        out.push(String::new());
    }

    out.join("\n")
}
