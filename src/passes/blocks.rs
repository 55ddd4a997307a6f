//! Line segmentation shared by the quote and monospace scanners.
//!
//! Both scanners cut a text into runs of plain lines and block nodes. A
//! block absorbs the newline before it and the one ending its last line.
//! Blank lines touching a block become NBSP so they stay visible next to a
//! block element, and a run made only of blank lines becomes one NBSP per
//! line.

use crate::model::{Document, Node};

const NBSP: &str = "\u{00A0}";

/// A run of plain lines or a finished block.
#[derive(Debug)]
pub(crate) enum Segment<'t> {
    Lines(Vec<&'t str>),
    Block(Node),
}

/// Split text into lines. The empty fragment after a final newline is not
/// a line; the flag reports whether it was there.
pub(crate) fn split_lines(text: &str) -> (Vec<&str>, bool) {
    match text.strip_suffix('\n') {
        Some(body) => (body.split('\n').collect(), true),
        None => (text.split('\n').collect(), false),
    }
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Join segments into a document, applying the blank-line rules.
pub(crate) fn assemble(segments: Vec<Segment<'_>>, terminated: bool) -> Document {
    let is_block: Vec<bool> = segments
        .iter()
        .map(|segment| matches!(segment, Segment::Block(_)))
        .collect();
    let count = segments.len();

    let mut doc = Document::new();
    for (idx, segment) in segments.into_iter().enumerate() {
        match segment {
            Segment::Block(node) => doc.push(node),
            Segment::Lines(lines) => {
                let after_block = idx > 0 && is_block[idx - 1];
                let before_block = idx + 1 < count && is_block[idx + 1];
                let terminate = terminated && idx + 1 == count;
                doc.push_text(plain_lines(&lines, after_block, before_block, terminate));
            }
        }
    }
    doc
}

fn plain_lines(lines: &[&str], after_block: bool, before_block: bool, terminate: bool) -> String {
    if lines.iter().all(|line| is_blank(line)) {
        return vec![NBSP; lines.len()].join("\n");
    }

    let first = lines.iter().position(|line| !is_blank(line)).unwrap_or(0);
    let last = lines
        .iter()
        .rposition(|line| !is_blank(line))
        .unwrap_or(lines.len());

    let mut output: Vec<&str> = Vec::with_capacity(lines.len());
    for (idx, &line) in lines.iter().enumerate() {
        let at_boundary = (after_block && idx < first) || (before_block && idx > last);
        output.push(if at_boundary { NBSP } else { line });
    }

    let mut text = output.join("\n");
    if terminate {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MonospaceBlock, Node};

    fn block() -> Segment<'static> {
        Segment::Block(Node::Monospace(MonospaceBlock {
            content: Document::from_text("#"),
        }))
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\nb"), (vec!["a", "b"], false));
        assert_eq!(split_lines("a\nb\n"), (vec!["a", "b"], true));
        assert_eq!(split_lines("\n"), (vec![""], true));
    }

    #[test]
    fn test_blank_lines_at_block_boundaries() {
        let doc = assemble(
            vec![
                Segment::Lines(vec!["foo", ""]),
                block(),
                Segment::Lines(vec!["", "quux"]),
            ],
            false,
        );
        assert_eq!(texts(&doc), vec!["foo\n\u{00A0}", "\u{00A0}\nquux"]);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_blank_only_run() {
        let doc = assemble(vec![block(), Segment::Lines(vec!["", " "]), block()], true);
        assert_eq!(texts(&doc), vec!["\u{00A0}\n\u{00A0}"]);
    }

    #[test]
    fn test_terminator_kept_on_last_run() {
        let doc = assemble(vec![block(), Segment::Lines(vec!["x"])], true);
        assert_eq!(texts(&doc), vec!["x\n"]);
    }

    #[test]
    fn test_inner_blank_lines_untouched() {
        let doc = assemble(vec![Segment::Lines(vec!["a", "", "b"]), block()], false);
        assert_eq!(texts(&doc), vec!["a\n\nb"]);
    }
}
