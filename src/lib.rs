//! # fidohtml
//!
//! Converts plain-text Fidonet messages into HTML.
//!
//! A message goes through an ordered list of passes that cut its text into
//! a tree of typed nodes (quotes, origin lines, UUE attachments, links,
//! pseudographics), then every node is rendered with a fixed HTML template.
//!
//! ## Quick Start
//!
//! ```
//! use fidohtml::FidoHtml;
//!
//! let converter = FidoHtml::default();
//! let html = converter.from_text("MB> Hello!\nHi there.");
//! assert_eq!(
//!     html,
//!     "<blockquote class=\"fidoQuote\">Hello!</blockquote>Hi there."
//! );
//! ```
//!
//! ## Features
//!
//! - **Quotes**: author initials and levels, nested by recursion
//! - **Control lines**: origin, tearline and tagline
//! - **Attachments**: UUE blocks as data URIs or external links
//! - **Pseudographics**: box-drawing runs kept in monospace blocks
//! - **Links**: lone URLs, Markdown-style links, images and videos
//! - **Fidonet Unicode**: `^{...}` substrings decoded
//! - **Batch conversion**: uses Rayon for many messages at once

pub mod codec;
pub mod error;
pub mod model;
pub mod passes;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use codec::{CharsetDecoder, FiunisDecoder};
pub use error::{Error, Result};
pub use model::{Document, Node, NodeKind};
pub use render::{
    Colors, ColorsPatch, ConversionStats, ConvertOptions, ConvertResult, JsonFormat, OptionsPatch,
    SchemeLists, UrlPrefix,
};

use pipeline::Pipeline;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Fidonet message to HTML converter.
///
/// The converter is immutable while converting; [`FidoHtml::set_options`]
/// takes `&mut self`, so option changes apply to the next conversion.
///
/// # Example
///
/// ```
/// use fidohtml::{ConvertOptions, FidoHtml, OptionsPatch};
///
/// let mut converter = FidoHtml::new(ConvertOptions::new().with_data_mode(true))?;
/// let html = converter.from_text("see http://example.com");
/// assert!(html.contains("data-href=\"http://example.com\""));
///
/// converter.set_options(OptionsPatch::new().data_mode(false))?;
/// let html = converter.from_text("see http://example.com");
/// assert!(html.contains("<a href=\"http://example.com\">"));
/// # Ok::<(), fidohtml::Error>(())
/// ```
pub struct FidoHtml {
    options: ConvertOptions,
    decoder: Arc<dyn CharsetDecoder>,
    pipeline: Pipeline,
}

impl FidoHtml {
    /// Create a converter.
    ///
    /// Fails if a scheme allowlist holds something that is not a scheme name.
    pub fn new(options: ConvertOptions) -> Result<Self> {
        Self::with_decoder(options, Arc::new(FiunisDecoder))
    }

    /// Create a converter with a custom Fidonet Unicode decoder.
    pub fn with_decoder(options: ConvertOptions, decoder: Arc<dyn CharsetDecoder>) -> Result<Self> {
        let pipeline = build_pipeline(&options.schemes, Arc::clone(&decoder))?;
        Ok(Self {
            options,
            decoder,
            pipeline,
        })
    }

    /// Current options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Merge a partial update into the options.
    ///
    /// On error the converter keeps its previous options.
    pub fn set_options(&mut self, patch: OptionsPatch) -> Result<()> {
        if let Some(schemes) = &patch.schemes {
            self.pipeline = build_pipeline(schemes, Arc::clone(&self.decoder))?;
            log::debug!("Rebuilt pipeline for new scheme lists");
        }
        self.options = std::mem::take(&mut self.options).merge(patch);
        Ok(())
    }

    /// Convert a message to HTML.
    pub fn from_text(&self, text: &str) -> String {
        self.render(&self.parse(text))
    }

    /// Split a message into its node tree without rendering it.
    pub fn parse(&self, text: &str) -> Document {
        let text = if text.contains('\r') {
            text.replace("\r\n", "\n")
        } else {
            text.to_string()
        };
        self.pipeline.split(Document::from_text(text))
    }

    /// Render a tree produced by [`FidoHtml::parse`].
    pub fn render(&self, doc: &Document) -> String {
        self.pipeline.render(doc, &self.options)
    }

    /// Convert a message and report what was found in it.
    pub fn from_text_with_stats(&self, text: &str) -> ConvertResult {
        let doc = self.parse(text);
        let stats = ConversionStats::from_document(&doc);
        ConvertResult::new(self.render(&doc), stats)
    }

    /// Convert many messages in parallel, keeping their order.
    pub fn convert_many<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<String> {
        texts
            .par_iter()
            .map(|text| self.from_text(text.as_ref()))
            .collect()
    }

    /// Read a message file and convert it.
    ///
    /// Bytes that are not UTF-8 are replaced rather than rejected.
    pub fn from_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let bytes = std::fs::read(path.as_ref())?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.as_ref().display());
        Ok(self.from_text(&String::from_utf8_lossy(&bytes)))
    }

    /// Dump a parsed tree as JSON.
    pub fn to_json(&self, doc: &Document, format: JsonFormat) -> Result<String> {
        render::to_json(doc, format)
    }
}

impl Default for FidoHtml {
    fn default() -> Self {
        Self::new(ConvertOptions::default()).expect("built-in scheme lists are valid")
    }
}

impl std::fmt::Debug for FidoHtml {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FidoHtml")
            .field("options", &self.options)
            .field("passes", &self.pipeline.splitter_names())
            .finish()
    }
}

fn build_pipeline(schemes: &SchemeLists, decoder: Arc<dyn CharsetDecoder>) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new();
    passes::register_splitters(&mut pipeline, schemes, decoder)?;
    render::register_renderers(&mut pipeline);
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FidoHtml>();
    }

    #[test]
    fn test_crlf_normalized() {
        let converter = FidoHtml::default();
        assert_eq!(converter.from_text("a\r\nb"), "a<br>b");
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(FidoHtml::default().from_text(""), "");
    }

    #[test]
    fn test_custom_decoder() {
        let decoder: Arc<dyn CharsetDecoder> = Arc::new(|text: &str| text.replace("@", "(at)"));
        let converter = FidoHtml::with_decoder(ConvertOptions::default(), decoder).unwrap();
        assert_eq!(converter.from_text("me@home"), "me(at)home");
    }

    #[test]
    fn test_invalid_scheme_rejected_on_new() {
        let options = ConvertOptions::new().with_schemes(SchemeLists::both(&["http", "1abc"]));
        assert!(matches!(FidoHtml::new(options), Err(Error::InvalidScheme(s)) if s == "1abc"));
    }

    #[test]
    fn test_set_options_error_keeps_state() {
        let mut converter = FidoHtml::default();
        let result =
            converter.set_options(OptionsPatch::new().data_mode(true).schemes(SchemeLists::both(&["a b"])));
        assert!(result.is_err());
        assert!(!converter.options().data_mode);
        assert!(converter.from_text("http://x").contains("<a href="));
    }

    #[test]
    fn test_set_options_schemes() {
        let mut converter = FidoHtml::default();
        converter
            .set_options(OptionsPatch::new().schemes(SchemeLists::both(&["gopher"])))
            .unwrap();
        assert_eq!(converter.from_text("http://x"), "http://x");
        assert_eq!(
            converter.from_text("gopher://x"),
            "<a href=\"gopher://x\">gopher://x</a>"
        );
    }

    #[test]
    fn test_debug_lists_passes() {
        let debug = format!("{:?}", FidoHtml::default());
        assert!(debug.contains("\"quote\""));
    }
}
