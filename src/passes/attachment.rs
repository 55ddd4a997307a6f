//! UUE attachment isolation.

use crate::codec::{mime_for_name, uue, UueChunk};
use crate::model::{Document, Node, UueAttachment};
use crate::pipeline::Splitter;

/// Replaces complete UUE blocks with [`UueAttachment`] nodes.
///
/// One newline is trimmed from the text on each side of a block so the
/// block element does not add an empty line.
#[derive(Debug, Clone, Copy, Default)]
pub struct UueSplitter;

impl Splitter for UueSplitter {
    fn name(&self) -> &'static str {
        "uue"
    }

    fn split(&self, text: String) -> Document {
        if !text.contains("begin ") {
            return Document::from_text(text);
        }

        let mut doc = Document::new();
        let mut chunks = uue::split(&text).into_iter().peekable();
        let mut after_file = false;
        while let Some(chunk) = chunks.next() {
            match chunk {
                UueChunk::Text(mut text) => {
                    if after_file && text.starts_with('\n') {
                        text.remove(0);
                    }
                    if matches!(chunks.peek(), Some(UueChunk::File(_))) && text.ends_with('\n') {
                        text.pop();
                    }
                    doc.push_text(text);
                    after_file = false;
                }
                UueChunk::File(file) => {
                    doc.push(Node::Uue(UueAttachment {
                        mime_hint: mime_for_name(&file.name),
                        name: file.name,
                        // Undo leading-space protection on data lines.
                        source: file.source.replace('\u{00A0}', " "),
                        data: file.data,
                    }));
                    after_file = true;
                }
            }
        }
        doc
    }
}
