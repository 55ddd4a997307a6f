//! Document-level types.

use super::Node;
use serde::{Deserialize, Serialize};

/// An ordered sequence of text fragments and typed nodes.
///
/// Order is reading order: the renderer emits nodes left to right and
/// never reorders them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create a document holding a single text fragment.
    ///
    /// An empty string yields an empty document.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.push_text(text);
        doc
    }

    /// Append a node.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Append a text fragment, skipping empty strings.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.nodes.push(Node::Text(text));
        }
    }

    /// Splice all nodes of another document in place.
    pub fn append(&mut self, other: Document) {
        self.nodes.extend(other.nodes);
    }

    /// Get the nodes of the document.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Take ownership of the nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over top-level nodes.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Get the textual content of the whole tree, markup ignored.
    pub fn plain_text(&self) -> String {
        self.nodes.iter().map(Node::plain_text).collect()
    }
}

impl From<Vec<Node>> for Document {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<Node> for Document {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
