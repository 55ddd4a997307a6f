//! Origin, tearline and tagline extraction.
//!
//! Each control line is matched once, against the end of the text: only
//! the last line of a fragment can be a control line, and trailing blank
//! lines after it are dropped.

use crate::model::{Document, Node, Origin, SignatureLine};
use crate::pipeline::Splitter;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static ORIGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A(?:(.*)\n)?([ \t\u{A0}]*\* Origin: [^\n]*)\(([^()\n]*)\)\s*\z").unwrap()
});

static TEARLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A(?:(.*)\n)?(---(?:[ \t\u{A0}][^\n]*)?)\s*\z").unwrap()
});

static TAGLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A(?:(.*)\n)?(\.\.\.[^\n]*)\s*\z").unwrap());

/// Which control line a [`ControlLine`] pass extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// `* Origin: text (address)`
    Origin,
    /// `---` optionally followed by a space and text
    Tearline,
    /// `...` followed by text
    Tagline,
}

/// Splits the trailing control line of a fragment into its own node.
#[derive(Debug, Clone, Copy)]
pub struct ControlLine {
    kind: ControlKind,
}

impl ControlLine {
    pub fn new(kind: ControlKind) -> Self {
        Self { kind }
    }

    fn pattern(&self) -> &'static Regex {
        match self.kind {
            ControlKind::Origin => &ORIGIN,
            ControlKind::Tearline => &TEARLINE,
            ControlKind::Tagline => &TAGLINE,
        }
    }

    fn node(&self, caps: &Captures<'_>) -> Node {
        match self.kind {
            ControlKind::Origin => Node::Origin(Origin {
                preamble: Document::from_text(&caps[2]),
                address: Document::from_text(&caps[3]),
                raw_address: caps[3].to_string(),
            }),
            ControlKind::Tearline => Node::Tearline(SignatureLine {
                content: Document::from_text(caps[2].trim_end()),
            }),
            ControlKind::Tagline => Node::Tagline(SignatureLine {
                content: Document::from_text(caps[2].trim_end()),
            }),
        }
    }
}

impl Splitter for ControlLine {
    fn name(&self) -> &'static str {
        match self.kind {
            ControlKind::Origin => "origin",
            ControlKind::Tearline => "tearline",
            ControlKind::Tagline => "tagline",
        }
    }

    fn split(&self, text: String) -> Document {
        let Some(caps) = self.pattern().captures(&text) else {
            return Document::from_text(text);
        };
        log::trace!("{} line found", self.name());

        let mut doc = Document::new();
        if let Some(before) = caps.get(1) {
            doc.push_text(before.as_str());
        }
        doc.push(self.node(&caps));
        doc
    }
}
