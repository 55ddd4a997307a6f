//! Fidonet Unicode substring decoding.

use crate::codec::CharsetDecoder;
use crate::model::Document;
use crate::pipeline::Splitter;
use std::sync::Arc;

/// Runs the configured [`CharsetDecoder`] over text fragments.
#[derive(Clone)]
pub struct CharsetSplitter {
    decoder: Arc<dyn CharsetDecoder>,
}

impl CharsetSplitter {
    pub fn new(decoder: Arc<dyn CharsetDecoder>) -> Self {
        Self { decoder }
    }
}

impl Splitter for CharsetSplitter {
    fn name(&self) -> &'static str {
        "charset"
    }

    fn split(&self, text: String) -> Document {
        Document::from_text(self.decoder.decode(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FiunisDecoder;

    #[test]
    fn test_decodes_substrings() {
        let splitter = CharsetSplitter::new(Arc::new(FiunisDecoder));
        let doc = splitter.split("^{JVQlUCVX}".to_string());
        assert_eq!(doc.plain_text(), "╔═╗");
    }
}
