//! Error types for fidohtml library.
//!
//! Converting a message never fails: malformed input degrades to the closest
//! structurally valid reading. Errors only come from the edges of the crate
//! (reading files, building a converter from custom settings, JSON dumps).

use std::io;
use thiserror::Error;

/// Result type alias for fidohtml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around message conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading message files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A URL scheme in an allowlist is not a valid scheme name.
    #[error("Invalid URL scheme: {0:?}")]
    InvalidScheme(String),

    /// A detection pattern could not be compiled.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Options could not be loaded.
    #[error("Invalid options: {0}")]
    Options(String),

    /// Error during rendering (JSON dumps).
    #[error("Rendering error: {0}")]
    Render(String),
}
