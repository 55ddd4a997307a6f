//! Fidonet Unicode substrings.
//!
//! Messages in 8-bit echoes carry characters outside their codepage as
//! `^{...}` substrings whose payload is base64 (padding optional) of the
//! UTF-16BE code units, in the manner of UTF-7. A substring that does not
//! decode to valid UTF-16 is left as written.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static SUBSTRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^\{([A-Za-z0-9+/]+={0,2})\}").unwrap());

const PAYLOAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decoder for legacy-charset substrings embedded in message text.
pub trait CharsetDecoder: Send + Sync {
    /// Return the text with every recognized substring decoded.
    fn decode(&self, text: &str) -> String;
}

impl<F> CharsetDecoder for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn decode(&self, text: &str) -> String {
        self(text)
    }
}

/// The built-in Fidonet Unicode substring decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiunisDecoder;

impl CharsetDecoder for FiunisDecoder {
    fn decode(&self, text: &str) -> String {
        if !text.contains("^{") {
            return text.to_string();
        }
        SUBSTRING
            .replace_all(text, |caps: &Captures| {
                decode_payload(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn decode_payload(payload: &str) -> Option<String> {
    let bytes = PAYLOAD.decode(payload).ok()?;
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}
