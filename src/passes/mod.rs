//! The splitter catalog.
//!
//! Passes run in this order:
//!
//! | Pass | Re-enters |
//! |---|---|
//! | leading space | - |
//! | origin, tearline, tagline | - |
//! | quote | - (recurses on its own) |
//! | UUE | quote text |
//! | Fidonet Unicode | quote text, origin, tearline, tagline |
//! | monospace | quote text |
//! | inline link, inline image, lone URL | quote text, monospace, signature lines, origin preamble; images also link text |
//! | escape | every text field except UUE source and image alt text |

mod attachment;
mod blocks;
mod charset;
mod control;
mod escape;
mod links;
mod monospace;
mod quote;
mod whitespace;

pub use attachment::UueSplitter;
pub use charset::CharsetSplitter;
pub use control::{ControlKind, ControlLine};
pub use escape::{escape_entities, escape_text, EscapeSplitter};
pub use links::{InlineImageSplitter, InlineLinkSplitter, LoneUrlSplitter, VIDEO_MARKER};
pub use monospace::MonospaceSplitter;
pub use quote::QuoteSplitter;
pub use whitespace::LeadingSpace;

use crate::codec::CharsetDecoder;
use crate::error::Result;
use crate::model::{Field, NodeKind};
use crate::pipeline::{Pipeline, Scope};
use crate::render::SchemeLists;
use std::sync::Arc;

fn quote_scope() -> Scope {
    Scope::fields(&[(NodeKind::Quote, Field::QuotedText)])
}

fn charset_scope() -> Scope {
    quote_scope()
        .with(NodeKind::Origin, Field::Preamble)
        .with(NodeKind::Origin, Field::Address)
        .with(NodeKind::Tearline, Field::Content)
        .with(NodeKind::Tagline, Field::Content)
}

fn link_scope() -> Scope {
    quote_scope()
        .with(NodeKind::Monospace, Field::Content)
        .with(NodeKind::Tearline, Field::Content)
        .with(NodeKind::Tagline, Field::Content)
        .with(NodeKind::Origin, Field::Preamble)
}

fn escape_scope() -> Scope {
    Scope::fields(&[
        (NodeKind::Hyperlink, Field::DisplayText),
        (NodeKind::InlineHyperlink, Field::LinkText),
        (NodeKind::Video, Field::LinkText),
        (NodeKind::Origin, Field::Preamble),
        (NodeKind::Origin, Field::Address),
        (NodeKind::Tearline, Field::Content),
        (NodeKind::Tagline, Field::Content),
        (NodeKind::Quote, Field::QuotedText),
        (NodeKind::Monospace, Field::Content),
    ])
}

/// Register every splitter in order.
///
/// Fails only if a scheme allowlist holds something that is not a scheme
/// name.
pub fn register_splitters(
    pipeline: &mut Pipeline,
    schemes: &SchemeLists,
    decoder: Arc<dyn CharsetDecoder>,
) -> Result<()> {
    // Build the fallible passes first so a bad allowlist leaves the
    // pipeline untouched.
    let inline_links = InlineLinkSplitter::new(&schemes.inline)?;
    let inline_images = InlineImageSplitter::new(&schemes.inline)?;
    let lone_urls = LoneUrlSplitter::new(&schemes.lone)?;

    pipeline.register_splitter(LeadingSpace, Scope::top_level());
    pipeline.register_splitter(ControlLine::new(ControlKind::Origin), Scope::top_level());
    pipeline.register_splitter(ControlLine::new(ControlKind::Tearline), Scope::top_level());
    pipeline.register_splitter(ControlLine::new(ControlKind::Tagline), Scope::top_level());
    pipeline.register_splitter(QuoteSplitter, Scope::top_level());
    pipeline.register_splitter(UueSplitter, quote_scope());
    pipeline.register_splitter(CharsetSplitter::new(decoder), charset_scope());
    pipeline.register_splitter(MonospaceSplitter, quote_scope());
    pipeline.register_splitter(inline_links, link_scope());
    pipeline.register_splitter(
        inline_images,
        link_scope()
            .with(NodeKind::InlineHyperlink, Field::LinkText)
            .with(NodeKind::Video, Field::LinkText),
    );
    pipeline.register_splitter(lone_urls, link_scope());
    pipeline.register_splitter(EscapeSplitter, escape_scope());
    Ok(())
}
