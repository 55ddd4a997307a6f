//! Monospace block detection.

use super::blocks::{assemble, split_lines, Segment};
use crate::model::{Document, MonospaceBlock, Node};
use crate::pipeline::Splitter;

/// Box drawing and block elements.
const PSEUDOGRAPHICS: std::ops::RangeInclusive<char> = '\u{2500}'..='\u{259F}';

/// Groups runs of pseudographical lines into [`MonospaceBlock`] nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceSplitter;

impl Splitter for MonospaceSplitter {
    fn name(&self) -> &'static str {
        "monospace"
    }

    fn split(&self, text: String) -> Document {
        if !text.chars().any(|c| PSEUDOGRAPHICS.contains(&c)) {
            return Document::from_text(text);
        }

        let (lines, terminated) = split_lines(&text);
        let mut segments = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut run_fixed = false;

        for line in lines {
            let fixed = is_fixed(line);
            if fixed != run_fixed && !run.is_empty() {
                segments.push(flush(std::mem::take(&mut run), run_fixed));
            }
            run_fixed = fixed;
            run.push(line);
        }
        if !run.is_empty() {
            segments.push(flush(run, run_fixed));
        }
        assemble(segments, terminated)
    }
}

fn is_fixed(line: &str) -> bool {
    line.chars().any(|c| PSEUDOGRAPHICS.contains(&c))
}

fn flush(lines: Vec<&str>, fixed: bool) -> Segment<'_> {
    if fixed {
        log::trace!("monospace block of {} lines", lines.len());
        Segment::Block(Node::Monospace(MonospaceBlock {
            content: Document::from_text(lines.join("\n")),
        }))
    } else {
        Segment::Lines(lines)
    }
}
