//! Conversion result with statistics.

use crate::model::{Document, FieldRef, Node};
use serde::{Deserialize, Serialize};

/// Result of converting a message, including HTML and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResult {
    /// The rendered HTML
    pub html: String,

    /// What the passes found
    pub stats: ConversionStats,
}

impl ConvertResult {
    /// Create a new conversion result.
    pub fn new(html: String, stats: ConversionStats) -> Self {
        Self { html, stats }
    }

    /// Get the HTML length in bytes.
    pub fn html_len(&self) -> usize {
        self.html.len()
    }
}

/// Counts of the nodes found in a message, nested ones included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Number of quotes
    pub quote_count: u32,

    /// Deepest quote level seen
    pub max_quote_level: u32,

    /// Number of lone URLs and inline links
    pub link_count: u32,

    /// Number of inline images
    pub image_count: u32,

    /// Number of video links
    pub video_count: u32,

    /// Number of UUE attachments
    pub attachment_count: u32,

    /// Decoded attachment bytes
    pub attachment_bytes: u64,

    /// Number of monospace blocks
    pub monospace_count: u32,

    /// Origin, tearline and tagline count
    pub control_line_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a split document.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::new();
        stats.count_document(doc);
        stats
    }

    fn count_document(&mut self, doc: &Document) {
        for node in doc {
            self.count_node(node);
        }
    }

    fn count_node(&mut self, node: &Node) {
        match node {
            Node::Text(_) => {}
            Node::Hyperlink(_) | Node::InlineHyperlink(_) => self.link_count += 1,
            Node::InlineImage(_) => self.image_count += 1,
            Node::Video(_) => self.video_count += 1,
            Node::Uue(uue) => {
                self.attachment_count += 1;
                self.attachment_bytes += uue.data.len() as u64;
            }
            Node::Origin(_) | Node::Tearline(_) | Node::Tagline(_) => {
                self.control_line_count += 1
            }
            Node::Quote(quote) => {
                self.quote_count += 1;
                self.max_quote_level = self.max_quote_level.max(quote.level as u32);
            }
            Node::Monospace(_) => self.monospace_count += 1,
        }

        for (_, field) in node.fields() {
            if let FieldRef::Document(nested) = field {
                self.count_document(nested);
            }
        }
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.quote_count += other.quote_count;
        self.max_quote_level = self.max_quote_level.max(other.max_quote_level);
        self.link_count += other.link_count;
        self.image_count += other.image_count;
        self.video_count += other.video_count;
        self.attachment_count += other.attachment_count;
        self.attachment_bytes += other.attachment_bytes;
        self.monospace_count += other.monospace_count;
        self.control_line_count += other.control_line_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InlineHyperlink, InlineImage, Quote};

    #[test]
    fn test_counts_nested_nodes() {
        let image = Node::InlineImage(InlineImage {
            alt_text: "cat".into(),
            url: "http://x/c.png".into(),
            scheme: "http".into(),
            title: None,
        });
        let link = Node::InlineHyperlink(InlineHyperlink {
            link_text: Document::from(vec![image]),
            url: "http://x/".into(),
            scheme: "http".into(),
            title: None,
        });
        let inner = Node::Quote(Quote {
            author_id: "CD".into(),
            level: 2,
            quoted_text: Document::from(vec![link]),
        });
        let doc = Document::from(vec![Node::Quote(Quote {
            author_id: "AB".into(),
            level: 1,
            quoted_text: Document::from(vec![inner]),
        })]);

        let stats = ConversionStats::from_document(&doc);
        assert_eq!(stats.quote_count, 2);
        assert_eq!(stats.max_quote_level, 2);
        assert_eq!(stats.link_count, 1);
        assert_eq!(stats.image_count, 1);
    }

    #[test]
    fn test_stats_merge() {
        let mut stats1 = ConversionStats {
            quote_count: 5,
            max_quote_level: 1,
            ..Default::default()
        };
        let stats2 = ConversionStats {
            quote_count: 3,
            max_quote_level: 3,
            attachment_count: 1,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.quote_count, 8);
        assert_eq!(stats1.max_quote_level, 3);
        assert_eq!(stats1.attachment_count, 1);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(ConversionStats::from_document(&Document::new()), ConversionStats::new());
    }
}
