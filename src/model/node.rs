//! Node variants and their nested fields.

use super::Document;
use serde::{Deserialize, Serialize};

/// A single element of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Node {
    /// Raw text, escaped by the final pass
    Text(String),

    /// A URL found in running text
    Hyperlink(Hyperlink),

    /// Markdown-style `[text](url "title")`
    InlineHyperlink(InlineHyperlink),

    /// Markdown-style `![alt](url "title")`
    InlineImage(InlineImage),

    /// Inline hyperlink whose title carried the `runevideo` marker
    Video(InlineHyperlink),

    /// A decoded UUE block
    Uue(UueAttachment),

    /// FTS-0004 origin line
    Origin(Origin),

    /// `---` line
    Tearline(SignatureLine),

    /// `...` line
    Tagline(SignatureLine),

    /// Quoted text with its author initials
    Quote(Quote),

    /// Run of pseudographical lines
    Monospace(MonospaceBlock),
}

/// Lone URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    /// Link target as written in the message
    pub url: String,
    /// Visible text
    pub display_text: String,
    /// Lowercased scheme (without colon)
    pub scheme: String,
}

/// Inline hyperlink (also the shape of a video link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineHyperlink {
    /// Link text, may contain inline images
    pub link_text: Document,
    /// Link target
    pub url: String,
    /// Lowercased scheme
    pub scheme: String,
    /// Tooltip
    pub title: Option<String>,
}

/// Inline image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    /// Alternative text
    pub alt_text: String,
    /// Image source
    pub url: String,
    /// Lowercased scheme
    pub scheme: String,
    /// Tooltip
    pub title: Option<String>,
}

/// UUE-encoded file isolated from the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UueAttachment {
    /// File name from the `begin` line
    pub name: String,
    /// MIME type guessed from the name
    pub mime_hint: String,
    /// The block as it appeared in the message
    pub source: String,
    /// Decoded bytes
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Origin line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Everything before the parenthesized address
    pub preamble: Document,
    /// Address as nested content
    pub address: Document,
    /// Address as written, for attributes
    pub raw_address: String,
}

/// Tearline or tagline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureLine {
    /// The whole line, marker included
    pub content: Document,
}

/// Quoted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Initials before the `>` marker (may be empty)
    pub author_id: String,
    /// Number of `>` characters
    pub level: usize,
    /// Quote content, itself split again
    pub quoted_text: Document,
}

/// Fixed-width block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonospaceBlock {
    /// Lines of the block
    pub content: Document,
}

/// Kind tag of a [`Node`], used for pass scopes and renderer dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Text,
    Hyperlink,
    InlineHyperlink,
    InlineImage,
    Video,
    Uue,
    Origin,
    Tearline,
    Tagline,
    Quote,
    Monospace,
}

impl NodeKind {
    /// All kinds, in declaration order.
    pub const ALL: [NodeKind; 11] = [
        NodeKind::Text,
        NodeKind::Hyperlink,
        NodeKind::InlineHyperlink,
        NodeKind::InlineImage,
        NodeKind::Video,
        NodeKind::Uue,
        NodeKind::Origin,
        NodeKind::Tearline,
        NodeKind::Tagline,
        NodeKind::Quote,
        NodeKind::Monospace,
    ];
}

/// Name of a text-bearing field inside a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// `Hyperlink::display_text`
    DisplayText,
    /// `InlineHyperlink::link_text` (also videos)
    LinkText,
    /// `InlineImage::alt_text`
    AltText,
    /// `UueAttachment::source`
    Source,
    /// `Origin::preamble`
    Preamble,
    /// `Origin::address`
    Address,
    /// `SignatureLine::content`, `MonospaceBlock::content`
    Content,
    /// `Quote::quoted_text`
    QuotedText,
}

/// Mutable access to a field: either a nested document or a plain string.
#[derive(Debug)]
pub enum FieldMut<'a> {
    Document(&'a mut Document),
    Text(&'a mut String),
}

/// Shared access to a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    Document(&'a Document),
    Text(&'a str),
}

impl Node {
    /// Get the kind tag of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text(_) => NodeKind::Text,
            Node::Hyperlink(_) => NodeKind::Hyperlink,
            Node::InlineHyperlink(_) => NodeKind::InlineHyperlink,
            Node::InlineImage(_) => NodeKind::InlineImage,
            Node::Video(_) => NodeKind::Video,
            Node::Uue(_) => NodeKind::Uue,
            Node::Origin(_) => NodeKind::Origin,
            Node::Tearline(_) => NodeKind::Tearline,
            Node::Tagline(_) => NodeKind::Tagline,
            Node::Quote(_) => NodeKind::Quote,
            Node::Monospace(_) => NodeKind::Monospace,
        }
    }

    /// Text-bearing fields, mutably, in rendering order.
    pub fn fields_mut(&mut self) -> Vec<(Field, FieldMut<'_>)> {
        match self {
            Node::Text(_) => Vec::new(),
            Node::Hyperlink(link) => vec![(Field::DisplayText, FieldMut::Text(&mut link.display_text))],
            Node::InlineHyperlink(link) | Node::Video(link) => {
                vec![(Field::LinkText, FieldMut::Document(&mut link.link_text))]
            }
            Node::InlineImage(image) => vec![(Field::AltText, FieldMut::Text(&mut image.alt_text))],
            Node::Uue(uue) => vec![(Field::Source, FieldMut::Text(&mut uue.source))],
            Node::Origin(origin) => vec![
                (Field::Preamble, FieldMut::Document(&mut origin.preamble)),
                (Field::Address, FieldMut::Document(&mut origin.address)),
            ],
            Node::Tearline(line) | Node::Tagline(line) => {
                vec![(Field::Content, FieldMut::Document(&mut line.content))]
            }
            Node::Quote(quote) => vec![(Field::QuotedText, FieldMut::Document(&mut quote.quoted_text))],
            Node::Monospace(block) => vec![(Field::Content, FieldMut::Document(&mut block.content))],
        }
    }

    /// Text-bearing fields, in rendering order.
    pub fn fields(&self) -> Vec<(Field, FieldRef<'_>)> {
        match self {
            Node::Text(_) => Vec::new(),
            Node::Hyperlink(link) => vec![(Field::DisplayText, FieldRef::Text(&link.display_text))],
            Node::InlineHyperlink(link) | Node::Video(link) => {
                vec![(Field::LinkText, FieldRef::Document(&link.link_text))]
            }
            Node::InlineImage(image) => vec![(Field::AltText, FieldRef::Text(&image.alt_text))],
            Node::Uue(uue) => vec![(Field::Source, FieldRef::Text(&uue.source))],
            Node::Origin(origin) => vec![
                (Field::Preamble, FieldRef::Document(&origin.preamble)),
                (Field::Address, FieldRef::Document(&origin.address)),
            ],
            Node::Tearline(line) | Node::Tagline(line) => {
                vec![(Field::Content, FieldRef::Document(&line.content))]
            }
            Node::Quote(quote) => vec![(Field::QuotedText, FieldRef::Document(&quote.quoted_text))],
            Node::Monospace(block) => vec![(Field::Content, FieldRef::Document(&block.content))],
        }
    }

    /// Textual content of this node, markup ignored.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Origin(origin) => format!(
                "{}({})",
                origin.preamble.plain_text(),
                origin.address.plain_text()
            ),
            other => other
                .fields()
                .into_iter()
                .map(|(_, field)| match field {
                    FieldRef::Document(doc) => doc.plain_text(),
                    FieldRef::Text(text) => text.to_string(),
                })
                .collect(),
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let node = Node::Tagline(SignatureLine {
            content: Document::from_text("... bye"),
        });
        assert_eq!(node.kind(), NodeKind::Tagline);
        assert_eq!(Node::Text("x".into()).kind(), NodeKind::Text);
    }

    #[test]
    fn test_fields_mut_exposes_nested_document() {
        let mut node = Node::Quote(Quote {
            author_id: String::new(),
            level: 2,
            quoted_text: Document::from_text("a"),
        });
        for (field, slot) in node.fields_mut() {
            assert_eq!(field, Field::QuotedText);
            if let FieldMut::Document(doc) = slot {
                doc.push_text("b");
            }
        }
        assert_eq!(node.plain_text(), "ab");
    }

    #[test]
    fn test_origin_plain_text_keeps_parentheses() {
        let node = Node::Origin(Origin {
            preamble: Document::from_text(" * Origin: Station "),
            address: Document::from_text("2:5020/1"),
            raw_address: "2:5020/1".to_string(),
        });
        assert_eq!(node.plain_text(), " * Origin: Station (2:5020/1)");
    }

    #[test]
    fn test_uue_serializes_data_as_base64() {
        let node = Node::Uue(UueAttachment {
            name: "cat.txt".into(),
            mime_hint: "text/plain".into(),
            source: String::new(),
            data: b"Cat".to_vec(),
        });
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"Q2F0\""));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
