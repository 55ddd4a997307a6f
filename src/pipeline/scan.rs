//! Regex scanning into literal and matched fragments.

use crate::model::{Document, Node};
use regex::{Captures, Regex};

/// A piece of scanned text.
#[derive(Debug)]
pub enum Fragment<'t> {
    /// Text between matches
    Literal(&'t str),
    /// A match with its capture groups
    Match(Captures<'t>),
}

/// Split `text` into alternating literal and matched fragments.
///
/// Empty literals are omitted; concatenating all fragments gives back
/// `text`.
pub fn scan<'t>(re: &Regex, text: &'t str) -> Vec<Fragment<'t>> {
    let mut fragments = Vec::new();
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            fragments.push(Fragment::Literal(&text[last..whole.start()]));
        }
        last = whole.end();
        fragments.push(Fragment::Match(caps));
    }
    if last < text.len() {
        fragments.push(Fragment::Literal(&text[last..]));
    }
    fragments
}

/// Scan `text` and build a document, turning matches into nodes.
///
/// When `to_node` declines a match (returns `None`) the matched text stays
/// literal.
pub fn split_matches<F>(re: &Regex, text: &str, mut to_node: F) -> Document
where
    F: FnMut(&Captures<'_>) -> Option<Node>,
{
    let mut doc = Document::new();
    let mut pending = String::new();
    for fragment in scan(re, text) {
        match fragment {
            Fragment::Literal(literal) => pending.push_str(literal),
            Fragment::Match(caps) => match to_node(&caps) {
                Some(node) => {
                    doc.push_text(std::mem::take(&mut pending));
                    doc.push(node);
                }
                None => pending.push_str(&caps[0]),
            },
        }
    }
    doc.push_text(pending);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_alternates() {
        let re = Regex::new(r"\d+").unwrap();
        let fragments = scan(&re, "a1b22");
        assert_eq!(fragments.len(), 4);
        assert!(matches!(fragments[0], Fragment::Literal("a")));
        assert!(matches!(&fragments[1], Fragment::Match(c) if &c[0] == "1"));
        assert!(matches!(fragments[2], Fragment::Literal("b")));
        assert!(matches!(&fragments[3], Fragment::Match(c) if &c[0] == "22"));
    }

    #[test]
    fn test_scan_no_match() {
        let re = Regex::new(r"\d+").unwrap();
        let fragments = scan(&re, "abc");
        assert!(matches!(fragments.as_slice(), [Fragment::Literal("abc")]));
    }

    #[test]
    fn test_split_matches_declined_match_stays_literal() {
        let re = Regex::new(r"\d+").unwrap();
        let doc = split_matches(&re, "a1b22c", |caps| {
            (caps[0].len() > 1).then(|| Node::Text(format!("<{}>", &caps[0])))
        });
        assert_eq!(
            doc.into_nodes(),
            vec![
                Node::Text("a1b".into()),
                Node::Text("<22>".into()),
                Node::Text("c".into()),
            ]
        );
    }
}
