//! Quote segmentation.
//!
//! A line scanner with two states. In `Plain`, a header line (`AB> text`)
//! opens a quote. In `Quote`, headers with the same author and level and
//! blank lines extend it; anything else closes it and is scanned again in
//! `Plain`. The body of each quote goes through the same scanner, which is
//! how nested quotes appear.
//!
//! Nesting is best effort: a deeper marker from another author inside a
//! quote starts a sibling quote, not a child of the open one.

use super::blocks::{assemble, is_blank, split_lines, Segment};
use crate::codec::uue;
use crate::model::{Document, Node, Quote};
use crate::pipeline::Splitter;
use regex::Regex;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^\s<>]*)(>+)\s*(.*)$").unwrap());

/// Splits quoted fragments into [`Quote`] nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteSplitter;

impl Splitter for QuoteSplitter {
    fn name(&self) -> &'static str {
        "quote"
    }

    fn split(&self, text: String) -> Document {
        segment(&text)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Header<'t> {
    author: &'t str,
    level: usize,
    rest: &'t str,
}

fn parse_header(line: &str) -> Option<Header<'_>> {
    let caps = HEADER.captures(line)?;
    Some(Header {
        author: caps.get(1)?.as_str(),
        level: caps.get(2)?.as_str().len(),
        rest: caps.get(3)?.as_str(),
    })
}

struct OpenQuote<'t> {
    author: &'t str,
    level: usize,
    lines: Vec<&'t str>,
    trailing_blank: usize,
}

impl<'t> OpenQuote<'t> {
    fn open(header: Header<'t>) -> Self {
        Self {
            author: header.author,
            level: header.level,
            lines: vec![header.rest],
            trailing_blank: 0,
        }
    }

    fn continues(&self, header: &Header<'_>) -> bool {
        header.author == self.author && header.level == self.level
    }

    fn push_line(&mut self, rest: &'t str) {
        self.lines.push(rest);
        self.trailing_blank = 0;
    }

    fn push_blank(&mut self, line: &'t str) {
        self.lines.push(line);
        self.trailing_blank += 1;
    }

    /// Emit the quote and hand back its trailing blank lines, which belong
    /// to the plain text after it.
    fn close(mut self, segments: &mut Vec<Segment<'t>>) -> Vec<&'t str> {
        let peeled = self.lines.split_off(self.lines.len() - self.trailing_blank);
        log::trace!(
            "quote by {:?} at level {}: {} lines",
            self.author,
            self.level,
            self.lines.len()
        );
        segments.push(Segment::Block(Node::Quote(Quote {
            author_id: self.author.to_string(),
            level: self.level,
            quoted_text: segment(&self.lines.join("\n")),
        })));
        peeled
    }
}

/// Run the quote scanner over a text.
pub(crate) fn segment(text: &str) -> Document {
    if !text.contains('\n') && parse_header(text).is_none() {
        return Document::from_text(text);
    }

    let (lines, terminated) = split_lines(text);
    let in_attachment = attachment_lines(&lines);

    let mut segments = Vec::new();
    let mut plain: Vec<&str> = Vec::new();
    let mut open: Option<OpenQuote<'_>> = None;

    for (idx, &line) in lines.iter().enumerate() {
        let header = if in_attachment[idx] {
            None
        } else {
            parse_header(line)
        };

        if let Some(quote) = open.as_mut() {
            match header {
                Some(ref h) if quote.continues(h) => {
                    quote.push_line(h.rest);
                    continue;
                }
                None if is_blank(line) => {
                    quote.push_blank(line);
                    continue;
                }
                _ => {
                    if let Some(quote) = open.take() {
                        plain = quote.close(&mut segments);
                    }
                }
            }
        }

        match header {
            Some(h) => {
                if !plain.is_empty() {
                    segments.push(Segment::Lines(std::mem::take(&mut plain)));
                }
                open = Some(OpenQuote::open(h));
            }
            None => plain.push(line),
        }
    }

    if let Some(quote) = open.take() {
        plain = quote.close(&mut segments);
    }
    if !plain.is_empty() {
        segments.push(Segment::Lines(plain));
    }
    assemble(segments, terminated)
}

/// Lines inside complete UUE blocks; their data may contain `>`.
fn attachment_lines(lines: &[&str]) -> Vec<bool> {
    let mut mask = vec![false; lines.len()];
    for range in uue::block_ranges(lines) {
        for idx in range {
            mask[idx] = true;
        }
    }
    mask
}
