//! Pipeline engine: ordered splitters and per-kind renderers.
//!
//! [`Pipeline::split`] folds every registered [`Splitter`] over the tree, one
//! pass at a time: a pass finishes on the whole document before the next
//! one starts. A splitter always sees top-level text; it descends into a
//! node's fields only when the (kind, field) pair is in its [`Scope`].
//!
//! [`Pipeline::render`] walks the final tree left to right and dispatches
//! each node to the renderer registered for its kind.
//!
//! # Example
//!
//! ```
//! use fidohtml::model::{Document, Node, NodeKind};
//! use fidohtml::pipeline::{Pipeline, Scope, Splitter};
//! use fidohtml::ConvertOptions;
//!
//! struct Shout;
//!
//! impl Splitter for Shout {
//!     fn name(&self) -> &'static str {
//!         "shout"
//!     }
//!
//!     fn split(&self, text: String) -> Document {
//!         Document::from_text(text.to_uppercase())
//!     }
//! }
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.register_splitter(Shout, Scope::top_level());
//! let doc = pipeline.split(Document::from_text("hello"));
//! assert_eq!(pipeline.render(&doc, &ConvertOptions::default()), "HELLO");
//! ```

mod scan;

pub use scan::{scan, split_matches, Fragment};

use crate::model::{Document, Field, FieldMut, Node, NodeKind};
use crate::render::ConvertOptions;
use std::collections::HashMap;
use std::sync::Arc;

/// A transformation from text to a document fragment.
pub trait Splitter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Split a text fragment; the result is spliced in its place.
    fn split(&self, text: String) -> Document;

    /// Rewrite a string-valued field in scope. Passes that only produce
    /// text override this; structural passes leave strings untouched.
    fn rewrite(&self, text: String) -> String {
        text
    }
}

/// The (kind, field) pairs a splitter may re-enter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    fields: Vec<(NodeKind, Field)>,
}

impl Scope {
    /// Top-level text only.
    pub fn top_level() -> Self {
        Self::default()
    }

    /// Top-level text plus the listed fields.
    pub fn fields(fields: &[(NodeKind, Field)]) -> Self {
        Self {
            fields: fields.to_vec(),
        }
    }

    /// Add one more pair.
    pub fn with(mut self, kind: NodeKind, field: Field) -> Self {
        if !self.contains(kind, field) {
            self.fields.push((kind, field));
        }
        self
    }

    /// Check whether the pair is in scope.
    pub fn contains(&self, kind: NodeKind, field: Field) -> bool {
        self.fields.iter().any(|&(k, f)| k == kind && f == field)
    }
}

/// Render function for one or more node kinds.
pub type RenderFn = dyn Fn(&Node, &RenderContext<'_>) -> String + Send + Sync;

/// What a renderer gets besides its node.
pub struct RenderContext<'a> {
    pipeline: &'a Pipeline,
    options: &'a ConvertOptions,
}

impl RenderContext<'_> {
    /// Options of the current conversion.
    pub fn options(&self) -> &ConvertOptions {
        self.options
    }

    /// Render a nested document.
    pub fn render(&self, doc: &Document) -> String {
        let mut output = String::new();
        for node in doc {
            match (node, self.pipeline.renderers.get(&node.kind())) {
                (_, Some(renderer)) => output.push_str(&renderer(node, self)),
                (Node::Text(text), None) => output.push_str(text),
                (other, None) => {
                    log::warn!("No renderer registered for {:?}", other.kind());
                }
            }
        }
        output
    }
}

struct RegisteredSplitter {
    splitter: Box<dyn Splitter>,
    scope: Scope,
}

/// Ordered splitters and per-kind renderers.
#[derive(Default)]
pub struct Pipeline {
    splitters: Vec<RegisteredSplitter>,
    renderers: HashMap<NodeKind, Arc<RenderFn>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a splitter; it runs after every splitter registered before.
    pub fn register_splitter<S: Splitter + 'static>(&mut self, splitter: S, scope: Scope) {
        self.splitters.push(RegisteredSplitter {
            splitter: Box::new(splitter),
            scope,
        });
    }

    /// Map node kinds to a render function, replacing earlier mappings.
    pub fn register_renderer<F>(&mut self, kinds: &[NodeKind], renderer: F)
    where
        F: Fn(&Node, &RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        let renderer: Arc<RenderFn> = Arc::new(renderer);
        for &kind in kinds {
            self.renderers.insert(kind, Arc::clone(&renderer));
        }
    }

    /// Names of the registered splitters, in order.
    pub fn splitter_names(&self) -> Vec<&'static str> {
        self.splitters.iter().map(|s| s.splitter.name()).collect()
    }

    /// Run every splitter over the document.
    pub fn split(&self, doc: Document) -> Document {
        self.splitters.iter().fold(doc, |doc, registered| {
            let doc = apply(registered, doc);
            log::debug!(
                "pass {}: {} top-level nodes",
                registered.splitter.name(),
                doc.len()
            );
            doc
        })
    }

    /// Render the document with the given options.
    pub fn render(&self, doc: &Document, options: &ConvertOptions) -> String {
        RenderContext {
            pipeline: self,
            options,
        }
        .render(doc)
    }
}

fn apply(registered: &RegisteredSplitter, doc: Document) -> Document {
    let mut output = Document::new();
    for node in doc {
        match node {
            Node::Text(text) => output.append(registered.splitter.split(text)),
            mut node => {
                let kind = node.kind();
                for (field, slot) in node.fields_mut() {
                    if !registered.scope.contains(kind, field) {
                        continue;
                    }
                    match slot {
                        FieldMut::Document(nested) => {
                            *nested = apply(registered, std::mem::take(nested));
                        }
                        FieldMut::Text(text) => {
                            *text = registered.splitter.rewrite(std::mem::take(text));
                        }
                    }
                }
                output.push(node);
            }
        }
    }
    output
}
