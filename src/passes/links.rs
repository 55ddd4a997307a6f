//! Hyperlink, inline image and inline video extraction.
//!
//! Patterns are built from the scheme allowlists when a converter is
//! created, so an invalid scheme name is reported once, up front.

use crate::error::{Error, Result};
use crate::model::{Document, Hyperlink, InlineHyperlink, InlineImage, Node};
use crate::pipeline::{split_matches, Splitter};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Title marker turning an inline link into a video.
pub const VIDEO_MARKER: &str = "runevideo";

/// Characters that end a lone URL.
const URL_BODY: &str = r#"[^\s<>"'{}|^\[\]`]+"#;

/// Alt text: any run without unescaped brackets.
const BRACKETED: &str = r"(?:[^\[\]\\]|\\.)*";

static SCHEME_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").unwrap());

// Unescapes `\[`, `\]` and `\\`, leaving nested image syntax alone.
static LINK_TEXT_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"!\[{}\]\([^()]*\)|\\([\[\]\\])", BRACKETED)).unwrap()
});

static ALT_TEXT_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\([\[\]\\])").unwrap());

/// Build a case-insensitive alternation of scheme names.
///
/// Returns `Ok(None)` for an empty list, which disables the pass.
fn scheme_alternation(schemes: &[String]) -> Result<Option<String>> {
    if schemes.is_empty() {
        return Ok(None);
    }
    let mut names = Vec::with_capacity(schemes.len());
    for scheme in schemes {
        if !SCHEME_NAME.is_match(scheme) {
            return Err(Error::InvalidScheme(scheme.clone()));
        }
        names.push(regex::escape(scheme));
    }
    // Longer names first so `irc6` is not cut to `irc`.
    names.sort_by(|a, b| b.len().cmp(&a.len()));
    Ok(Some(format!("(?i:{})", names.join("|"))))
}

fn compile(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(pattern)?)
}

/// Markdown-style `[text](url "title")`, and video links.
///
/// A match preceded by `!` is an image and is left for [`InlineImageSplitter`].
#[derive(Debug, Clone)]
pub struct InlineLinkSplitter {
    pattern: Option<Regex>,
}

impl InlineLinkSplitter {
    pub fn new(schemes: &[String]) -> Result<Self> {
        let Some(schemes) = scheme_alternation(schemes)? else {
            return Ok(Self { pattern: None });
        };
        let pattern = format!(
            r#"(!?)\[((?:!\[{b}\]\([^()]*\)|\\.|[^\[\]\\])*)\]\((({s}):[^\s()<>"]+)(?:\s+"([^"]*)")?\s*\)"#,
            b = BRACKETED,
            s = schemes,
        );
        Ok(Self {
            pattern: Some(compile(&pattern)?),
        })
    }

    fn to_node(caps: &Captures<'_>) -> Option<Node> {
        if !caps[1].is_empty() {
            return None;
        }
        let link_text = LINK_TEXT_ESCAPE.replace_all(&caps[2], |c: &Captures| match c.get(1) {
            Some(escaped) => escaped.as_str().to_string(),
            None => c[0].to_string(),
        });
        let title = caps.get(5).map(|m| m.as_str());
        let video_title = title.and_then(|t| t.strip_prefix(VIDEO_MARKER));

        let mut link = InlineHyperlink {
            link_text: Document::from_text(link_text.into_owned()),
            url: caps[3].to_string(),
            scheme: caps[4].to_lowercase(),
            title: title.map(str::to_string),
        };

        match video_title {
            Some(rest) => {
                let rest = rest.strip_prefix(' ').unwrap_or(rest);
                link.title = (!rest.is_empty()).then(|| rest.to_string());
                log::trace!("video link {}", link.url);
                Some(Node::Video(link))
            }
            None => {
                log::trace!("inline link {}", link.url);
                Some(Node::InlineHyperlink(link))
            }
        }
    }
}

impl Splitter for InlineLinkSplitter {
    fn name(&self) -> &'static str {
        "inline_link"
    }

    fn split(&self, text: String) -> Document {
        match &self.pattern {
            Some(pattern) if text.contains("](") => split_matches(pattern, &text, Self::to_node),
            _ => Document::from_text(text),
        }
    }
}

/// Markdown-style `![alt](url "title")`.
#[derive(Debug, Clone)]
pub struct InlineImageSplitter {
    pattern: Option<Regex>,
}

impl InlineImageSplitter {
    pub fn new(schemes: &[String]) -> Result<Self> {
        let Some(schemes) = scheme_alternation(schemes)? else {
            return Ok(Self { pattern: None });
        };
        let pattern = format!(
            r#"!\[({b})\]\((({s}):[^\s()<>"]+)(?:\s+"([^"]*)")?\s*\)"#,
            b = BRACKETED,
            s = schemes,
        );
        Ok(Self {
            pattern: Some(compile(&pattern)?),
        })
    }

    fn to_node(caps: &Captures<'_>) -> Option<Node> {
        log::trace!("inline image {}", &caps[2]);
        Some(Node::InlineImage(InlineImage {
            alt_text: ALT_TEXT_ESCAPE.replace_all(&caps[1], "$1").into_owned(),
            url: caps[2].to_string(),
            scheme: caps[3].to_lowercase(),
            title: caps.get(4).map(|m| m.as_str().to_string()),
        }))
    }
}

impl Splitter for InlineImageSplitter {
    fn name(&self) -> &'static str {
        "inline_image"
    }

    fn split(&self, text: String) -> Document {
        match &self.pattern {
            Some(pattern) if text.contains("![") => split_matches(pattern, &text, Self::to_node),
            _ => Document::from_text(text),
        }
    }
}

/// URLs in running text.
#[derive(Debug, Clone)]
pub struct LoneUrlSplitter {
    pattern: Option<Regex>,
}

impl LoneUrlSplitter {
    pub fn new(schemes: &[String]) -> Result<Self> {
        let Some(schemes) = scheme_alternation(schemes)? else {
            return Ok(Self { pattern: None });
        };
        let pattern = format!(r"\b({}):{}", schemes, URL_BODY);
        Ok(Self {
            pattern: Some(compile(&pattern)?),
        })
    }

    fn to_node(caps: &Captures<'_>) -> Option<Node> {
        log::trace!("lone url {}", &caps[0]);
        Some(Node::Hyperlink(Hyperlink {
            url: caps[0].to_string(),
            display_text: caps[0].to_string(),
            scheme: caps[1].to_lowercase(),
        }))
    }
}

impl Splitter for LoneUrlSplitter {
    fn name(&self) -> &'static str {
        "lone_url"
    }

    fn split(&self, text: String) -> Document {
        match &self.pattern {
            Some(pattern) if text.contains(':') => split_matches(pattern, &text, Self::to_node),
            _ => Document::from_text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DEFAULT_SCHEMES;

    fn schemes() -> Vec<String> {
        DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_schemes_are_valid_names() {
        for scheme in DEFAULT_SCHEMES {
            assert!(SCHEME_NAME.is_match(scheme), "{}", scheme);
        }
        assert!(scheme_alternation(&schemes()).unwrap().is_some());
    }

    fn lone(text: &str) -> Vec<Node> {
        LoneUrlSplitter::new(&schemes())
            .unwrap()
            .split(text.to_string())
            .into_nodes()
    }

    fn inline(text: &str) -> Vec<Node> {
        InlineLinkSplitter::new(&schemes())
            .unwrap()
            .split(text.to_string())
            .into_nodes()
    }

    fn image(text: &str) -> Vec<Node> {
        InlineImageSplitter::new(&schemes())
            .unwrap()
            .split(text.to_string())
            .into_nodes()
    }

    #[test]
    fn test_lone_url() {
        let nodes = lone("see http://example.com/a?b=c, then");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], Node::Text("see ".into()));
        assert_eq!(
            nodes[1],
            Node::Hyperlink(Hyperlink {
                url: "http://example.com/a?b=c,".into(),
                display_text: "http://example.com/a?b=c,".into(),
                scheme: "http".into(),
            })
        );
    }

    #[test]
    fn test_lone_url_stops_at_delimiters() {
        let nodes = lone("<https://x.org/>");
        assert!(matches!(&nodes[1], Node::Hyperlink(l) if l.url == "https://x.org/"));
        assert_eq!(nodes[2], Node::Text(">".into()));
    }

    #[test]
    fn test_unknown_scheme_not_linked() {
        let text = "notascheme:thing";
        assert_eq!(lone(text), vec![Node::Text(text.into())]);
    }

    #[test]
    fn test_scheme_followed_by_space_not_linked() {
        let text = "mailto: foo";
        assert_eq!(lone(text), vec![Node::Text(text.into())]);
    }

    #[test]
    fn test_scheme_inside_word_not_linked() {
        let text = "xhttp://a";
        assert_eq!(lone(text), vec![Node::Text(text.into())]);
    }

    #[test]
    fn test_fidonet_scheme_case_insensitive() {
        let nodes = lone("AREA://SU.FIDOTECH");
        assert!(matches!(&nodes[0], Node::Hyperlink(l) if l.scheme == "area"));
    }

    #[test]
    fn test_longest_scheme_wins() {
        let nodes = lone("irc6://host");
        assert!(matches!(&nodes[0], Node::Hyperlink(l) if l.scheme == "irc6"));
    }

    #[test]
    fn test_inline_link_with_title() {
        let nodes = inline(r#"go [the \[site\]](https://x.org "Home") now"#);
        assert_eq!(nodes.len(), 3);
        match &nodes[1] {
            Node::InlineHyperlink(link) => {
                assert_eq!(link.link_text.plain_text(), "the [site]");
                assert_eq!(link.url, "https://x.org");
                assert_eq!(link.title.as_deref(), Some("Home"));
            }
            other => panic!("expected link, got {:?}", other),
        }
    }

    #[test]
    fn test_image_left_for_image_pass() {
        let text = "![cat](http://x/cat.png)";
        assert_eq!(inline(text), vec![Node::Text(text.into())]);
    }

    #[test]
    fn test_link_around_image() {
        let nodes = inline("[![cat](http://x/c.png)](http://x/)");
        match &nodes[0] {
            Node::InlineHyperlink(link) => {
                assert_eq!(link.link_text.plain_text(), "![cat](http://x/c.png)");
                assert_eq!(link.url, "http://x/");
            }
            other => panic!("expected link, got {:?}", other),
        }
    }

    #[test]
    fn test_video_marker() {
        let nodes = inline(r#"[clip](https://v.example/a.mp4 "runevideo Cats")"#);
        match &nodes[0] {
            Node::Video(video) => assert_eq!(video.title.as_deref(), Some("Cats")),
            other => panic!("expected video, got {:?}", other),
        }

        let nodes = inline(r#"[clip](https://v.example/a.mp4 "runevideo")"#);
        assert!(matches!(&nodes[0], Node::Video(v) if v.title.is_none()));
    }

    #[test]
    fn test_inline_image() {
        let nodes = image(r#"![a \] cat](http://x/c.png "Tom")"#);
        assert_eq!(
            nodes,
            vec![Node::InlineImage(InlineImage {
                alt_text: "a ] cat".into(),
                url: "http://x/c.png".into(),
                scheme: "http".into(),
                title: Some("Tom".into()),
            })]
        );
    }

    #[test]
    fn test_inline_unknown_scheme() {
        let text = "[x](javascript:alert(1))";
        assert_eq!(inline(text), vec![Node::Text(text.into())]);
    }

    #[test]
    fn test_invalid_scheme_rejected() {
        let result = LoneUrlSplitter::new(&["ht tp".to_string()]);
        assert!(matches!(result, Err(Error::InvalidScheme(s)) if s == "ht tp"));
    }

    #[test]
    fn test_empty_allowlist_disables_pass() {
        let splitter = LoneUrlSplitter::new(&[]).unwrap();
        let doc = splitter.split("http://x".to_string());
        assert_eq!(doc.into_nodes(), vec![Node::Text("http://x".into())]);
    }
}
