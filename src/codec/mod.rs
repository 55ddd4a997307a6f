//! Text primitives used by the passes and renderers.
//!
//! - [`uue`]: isolating and decoding uuencoded blocks
//! - [`fiunis`]: Fidonet Unicode substrings
//! - [`data_uri`]: MIME sniffing, base64, `data:` URIs and URI components

pub mod data_uri;
pub mod fiunis;
pub mod uue;

pub use data_uri::{base64_encode, data_uri, encode_uri_component, is_image_mime, mime_for_name};
pub use fiunis::{CharsetDecoder, FiunisDecoder};
pub use uue::{block_ranges, UueChunk, UueFile};
