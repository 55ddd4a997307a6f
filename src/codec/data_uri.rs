//! MIME sniffing and URI builders for attachments.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Guess a MIME type from a file name, `application/octet-stream` if unknown.
pub fn mime_for_name(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Check whether a MIME type denotes an image.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Standard base64 with padding.
pub fn base64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Build `data:<mime>;base64,<payload>`.
pub fn data_uri(mime: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime, base64_encode(data))
}

/// Percent-encode a string the way `encodeURIComponent` does.
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_name() {
        assert_eq!(mime_for_name("cat.txt"), "text/plain");
        assert_eq!(mime_for_name("photo.JPG"), "image/jpeg");
        assert_eq!(mime_for_name("noextension"), "application/octet-stream");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("text/plain", b"Cat"), "data:text/plain;base64,Q2F0");
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("my file (1).txt"), "my%20file%20(1).txt");
        assert_eq!(encode_uri_component("a&b=c/d"), "a%26b%3Dc%2Fd");
        assert_eq!(encode_uri_component("кот"), "%D0%BA%D0%BE%D1%82");
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(!is_image_mime("text/plain"));
    }
}
