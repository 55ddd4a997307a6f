//! Leading-space protection.

use crate::model::Document;
use crate::pipeline::Splitter;

/// Turns a lone space at the start of a line into NBSP so HTML keeps it.
///
/// A space followed by another space is left for the escaping pass, which
/// protects every second space of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingSpace;

impl Splitter for LeadingSpace {
    fn name(&self) -> &'static str {
        "leading_space"
    }

    fn split(&self, text: String) -> Document {
        Document::from_text(protect_leading_space(&text))
    }
}

fn protect_leading_space(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 8);
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        match line.strip_prefix(' ') {
            Some(rest) if !rest.starts_with(' ') => {
                output.push('\u{00A0}');
                output.push_str(rest);
            }
            _ => output.push_str(line),
        }
    }
    output
}
