//! HTML escaping of text fields.

use crate::model::Document;
use crate::pipeline::Splitter;

/// Escapes text for HTML: entities first, then space runs and newlines.
///
/// This is the last pass; every other piece of markup comes from a
/// renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeSplitter;

impl Splitter for EscapeSplitter {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn split(&self, text: String) -> Document {
        Document::from_text(escape_text(&text))
    }

    fn rewrite(&self, text: String) -> String {
        escape_text(&text)
    }
}

/// Escape message text, keeping space runs and line breaks visible.
pub fn escape_text(text: &str) -> String {
    escape_entities(text)
        .replace("  ", " \u{00A0}")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

/// Escape `&`, `<`, `>` and `"`, ampersand first.
pub fn escape_entities(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
