//! Document model types for Fidonet message representation.
//!
//! This module defines the intermediate representation (IR) that bridges
//! the splitting passes and the HTML renderers. A [`Document`] is an ordered
//! sequence of [`Node`]s; several node kinds carry nested documents that
//! later passes may re-enter when their scope allows it.

mod document;
mod node;

pub use document::Document;
pub use node::{
    Field, FieldMut, FieldRef, Hyperlink, InlineHyperlink, InlineImage, MonospaceBlock, Node,
    NodeKind, Origin, Quote, SignatureLine, UueAttachment,
};
