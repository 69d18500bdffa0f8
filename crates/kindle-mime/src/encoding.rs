//! MIME encoding utilities.
//!
//! Supports Base64 bodies, RFC 2047 header encoding, RFC 2231 parameter
//! values and header folding.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Maximum line length for encoded bodies (RFC 2045).
pub const MAX_LINE_LENGTH: usize = 76;

/// Column at which header lines are folded (RFC 5322 section 2.1.1).
pub const MAX_HEADER_WIDTH: usize = 78;

/// Maximum length of one encoded word (RFC 2047 section 2).
const MAX_ENCODED_WORD_LENGTH: usize = 75;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data, ignoring embedded line breaks.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Encodes data as Base64 split into CRLF-terminated lines of at most
/// [`MAX_LINE_LENGTH`] characters.
///
/// Empty input yields an empty string.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = encode_base64(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2 + 2);

    // Base64 output is pure ASCII, so byte chunks are valid char boundaries.
    for line in encoded.as_bytes().chunks(MAX_LINE_LENGTH) {
        result.push_str(&String::from_utf8_lossy(line));
        result.push_str("\r\n");
    }

    result
}

/// Encodes a header value using RFC 2047 if needed.
///
/// Format: `=?charset?B?encoded-text?=`
///
/// Plain ASCII text is returned unchanged unless it contains `=?`, control
/// characters, runs of spaces or a word too long to fold. Anything else is
/// split on character boundaries into encoded words of at most 75
/// characters, separated by single spaces so the header can be folded
/// between them.
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if !needs_rfc2047(text) {
        return text.to_string();
    }

    // Base64 turns every 3 bytes into 4 characters; 7 is the `=???B?=` frame.
    let max_bytes = MAX_ENCODED_WORD_LENGTH.saturating_sub(charset.len() + 7) / 4 * 3;
    let mut words = Vec::new();
    let mut start = 0;

    for (index, ch) in text.char_indices() {
        if index + ch.len_utf8() - start > max_bytes && index > start {
            words.push(encoded_word(&text[start..index], charset));
            start = index;
        }
    }
    words.push(encoded_word(&text[start..], charset));

    words.join(" ")
}

fn needs_rfc2047(text: &str) -> bool {
    !text.is_ascii()
        || text.contains("=?")
        || text.chars().any(|c| c.is_ascii_control())
        || text.contains("  ")
        || text.split(' ').any(|word| word.len() >= MAX_HEADER_WIDTH)
}

fn encoded_word(text: &str, charset: &str) -> String {
    format!("=?{charset}?B?{}?=", encode_base64(text.as_bytes()))
}

/// Percent-encodes a value for an RFC 2231 extended parameter.
///
/// Only attribute characters pass through. The caller adds the charset
/// prefix.
#[must_use]
pub fn encode_rfc2231(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        if is_attribute_char(byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

/// Decodes a percent-encoded RFC 2231 value as UTF-8.
///
/// Malformed escapes are kept as written.
#[must_use]
pub fn decode_rfc2231(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        let escaped = (bytes[index] == b'%')
            .then(|| text.get(index + 1..index + 3))
            .flatten()
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());

        if let Some(byte) = escaped {
            decoded.push(byte);
            index += 3;
        } else {
            decoded.push(bytes[index]);
            index += 1;
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

/// Token characters other than `*`, `'` and `%` (RFC 2231 section 7).
fn is_attribute_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte)
}

/// Formats `name: value`, folding at spaces so lines stay within
/// [`MAX_HEADER_WIDTH`] columns where the words allow it.
///
/// Continuation lines start with the space they were folded at. The result
/// has no trailing CRLF.
#[must_use]
pub fn fold_header(name: &str, value: &str) -> String {
    let mut folded = format!("{name}:");
    let mut line_len = folded.len();

    for (index, word) in value.split(' ').enumerate() {
        if index > 0 && !word.is_empty() && line_len + 1 + word.len() > MAX_HEADER_WIDTH {
            folded.push_str("\r\n");
            line_len = 0;
        }
        folded.push(' ');
        folded.push_str(word);
        line_len += 1 + word.len();
    }

    folded
}
