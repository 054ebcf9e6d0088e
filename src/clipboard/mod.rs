//! Clipboard codec for rectangular cell blocks.
//!
//! Reading prefers the HTML flavour (a `<table>`) and falls back to
//! tab-separated text. Writing always produces both flavours. Malformed
//! input never errors: the worst case is a single cell holding the raw text.

mod html;
mod text;
#[cfg(target_arch = "wasm32")]
mod web;

pub use html::{html_text_content, parse_html_table, serialize_html};
pub use text::{parse_text, serialize_text};
#[cfg(target_arch = "wasm32")]
pub use web::DataTransferClipboard;

use serde::{Deserialize, Serialize};

/// The flavours found on (or destined for) the system clipboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardPayload {
    pub html: Option<String>,
    pub text: Option<String>,
}

impl ClipboardPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            html: None,
            text: Some(text.into()),
        }
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            text: None,
        }
    }
}

/// Both flavours of a serialized block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedClipboard {
    pub text: String,
    pub html: String,
}

/// Access to a clipboard: the system one in a browser, a buffer elsewhere.
pub trait ClipboardPort {
    fn read(&mut self) -> ClipboardPayload;
    fn write(&mut self, html: &str, text: &str);
}

/// In-memory clipboard used outside the browser and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    pub contents: ClipboardPayload,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: ClipboardPayload::text(text),
        }
    }
}

impl ClipboardPort for MemoryClipboard {
    fn read(&mut self) -> ClipboardPayload {
        self.contents.clone()
    }

    fn write(&mut self, html: &str, text: &str) {
        self.contents = ClipboardPayload {
            html: Some(html.to_string()),
            text: Some(text.to_string()),
        };
    }
}

/// Decode a clipboard payload into rows of cells.
///
/// An HTML table wins over the text flavour. HTML without a table falls
/// back to the text flavour, or to the HTML's own text content when there
/// is no text. A payload with neither flavour yields no rows.
pub fn parse(payload: &ClipboardPayload) -> Vec<Vec<String>> {
    if let Some(html) = payload.html.as_deref() {
        if let Some(rows) = parse_html_table(html) {
            log::debug!("pasting {} rows from html table", rows.len());
            return rows;
        }
        if payload.text.is_none() {
            return html_text_content(html)
                .map(|text| parse_text(&text))
                .unwrap_or_else(|| vec![vec![html.to_string()]]);
        }
    }

    match payload.text.as_deref() {
        Some(text) => parse_text(text),
        None => Vec::new(),
    }
}

/// Encode rows of cells into both clipboard flavours.
pub fn serialize(rows: &[Vec<String>]) -> SerializedClipboard {
    SerializedClipboard {
        text: serialize_text(rows),
        html: serialize_html(rows),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_html_preferred_over_text() {
        let payload = ClipboardPayload {
            html: Some("<table><tr><td>from html</td></tr></table>".to_string()),
            text: Some("from text".to_string()),
        };
        assert_eq!(parse(&payload), vec![vec!["from html"]]);
    }

    #[test]
    fn test_html_without_table_falls_back_to_text() {
        let payload = ClipboardPayload {
            html: Some("<p>styled</p>".to_string()),
            text: Some("a\tb".to_string()),
        };
        assert_eq!(parse(&payload), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_html_only_uses_text_content() {
        let payload = ClipboardPayload::html("<span>just&nbsp;this</span>");
        assert_eq!(parse(&payload), vec![vec!["just this"]]);
    }

    #[test]
    fn test_empty_payload() {
        assert!(parse(&ClipboardPayload::default()).is_empty());
        assert_eq!(parse(&ClipboardPayload::text("")), vec![vec![""]]);
    }

    #[test]
    fn test_serialize_then_parse_both_flavours() {
        let rows = vec![
            vec!["1".to_string(), "a & b".to_string()],
            vec!["<x>".to_string(), String::new()],
        ];
        let out = serialize(&rows);
        assert_eq!(parse(&ClipboardPayload::text(out.text.clone())), rows);
        assert_eq!(parse(&ClipboardPayload::html(out.html.clone())), rows);
    }

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::new();
        clipboard.write("<table></table>", "x");
        assert_eq!(clipboard.read().text.as_deref(), Some("x"));
    }
}
