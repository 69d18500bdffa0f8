//! MIME message structure and serialization.

use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_rfc2231, encode_base64_wrapped, encode_rfc2231};
use crate::error::Result;
use crate::header::Headers;
use std::fmt;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// Base64 encoding.
    Base64,
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

/// Longest filename written as a plain quoted parameter.
const MAX_QUOTED_FILENAME: usize = 60;

/// Longest percent-encoded piece of one RFC 2231 continuation.
const MAX_CONTINUATION_LENGTH: usize = 48;

/// MIME message part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body, already transfer-encoded.
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Creates a base64-encoded attachment part.
    ///
    /// Short printable ASCII filenames are written as `filename="..."`.
    /// Anything else uses the RFC 2231 `filename*` form, split into
    /// continuations when long.
    #[must_use]
    pub fn attachment(content_type: ContentType, filename: &str, data: &[u8]) -> Self {
        let mut headers = Headers::new();
        headers.add("Content-Type", content_type.to_string());
        headers.add("MIME-Version", "1.0");
        headers.add("Content-Transfer-Encoding", TransferEncoding::Base64.to_string());
        headers.add("Content-Disposition", attachment_disposition(filename));

        Self::new(headers, encode_base64_wrapped(data).into_bytes())
    }

    /// Gets the content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers.get("content-type").map_or_else(
            || Ok(ContentType::new("text", "plain")),
            ContentType::parse,
        )
    }

    /// Gets the transfer encoding. Anything but base64 is treated as 7bit.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        match self.headers.get("content-transfer-encoding") {
            Some(value) if value.trim().eq_ignore_ascii_case("base64") => TransferEncoding::Base64,
            _ => TransferEncoding::SevenBit,
        }
    }

    /// Gets the filename from the `Content-Disposition` header.
    ///
    /// Both the quoted form and RFC 2231 `filename*` values, including
    /// numbered continuations, are understood.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        let disposition = self.headers.get("content-disposition")?;
        let mut pieces = Vec::new();

        for parameter in disposition.split(';').skip(1) {
            let Some((key, value)) = parameter.split_once('=') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            if key == "filename" {
                return Some(value.trim_matches('"').to_string());
            }
            if key == "filename*" {
                pieces.push((0, value));
            } else if let Some(index) = key
                .strip_prefix("filename*")
                .and_then(|rest| rest.strip_suffix('*'))
                .and_then(|index| index.parse::<usize>().ok())
            {
                pieces.push((index, value));
            }
        }

        if pieces.is_empty() {
            return None;
        }
        pieces.sort_by_key(|(index, _)| *index);
        let joined: String = pieces.into_iter().map(|(_, value)| value).collect();
        // charset'language'value
        let (_, encoded) = joined.split_once('\'')?;
        let (_, encoded) = encoded.split_once('\'')?;
        Some(decode_rfc2231(encoded))
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        match self.transfer_encoding() {
            TransferEncoding::Base64 => decode_base64(&String::from_utf8_lossy(&self.body)),
            TransferEncoding::SevenBit => Ok(self.body.clone()),
        }
    }
}

/// Builds an `attachment` disposition carrying `filename`.
fn attachment_disposition(filename: &str) -> String {
    let plain = filename.len() <= MAX_QUOTED_FILENAME
        && filename
            .bytes()
            .all(|b| (b.is_ascii_graphic() || b == b' ') && !matches!(b, b'"' | b'\\' | b';'));
    if plain {
        return format!("attachment; filename=\"{filename}\"");
    }

    let encoded = encode_rfc2231(filename);
    let pieces = continuation_pieces(&encoded);
    if let [single] = pieces.as_slice() {
        return format!("attachment; filename*=utf-8''{single}");
    }

    let mut disposition = String::from("attachment");
    for (index, piece) in pieces.iter().enumerate() {
        let charset = if index == 0 { "utf-8''" } else { "" };
        disposition.push_str(&format!("; filename*{index}*={charset}{piece}"));
    }
    disposition
}

/// Splits a percent-encoded value without breaking `%XX` escapes.
fn continuation_pieces(encoded: &str) -> Vec<&str> {
    let bytes = encoded.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut index = 0;

    while index < bytes.len() {
        let width = if bytes[index] == b'%' { 3 } else { 1 };
        if index + width - start > MAX_CONTINUATION_LENGTH && index > start {
            pieces.push(&encoded[start..index]);
            start = index;
        }
        index += width;
    }
    pieces.push(&encoded[start..]);

    pieces
}

/// Multipart MIME message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Message parts.
    pub parts: Vec<Part>,
    boundary: String,
}

impl Message {
    /// Creates an empty `multipart/mixed` message with a random boundary.
    #[must_use]
    pub fn multipart_mixed() -> Self {
        let token: u64 = rand::random();
        Self::with_boundary(format!("==============={token:019}=="))
    }

    /// Creates an empty `multipart/mixed` message with the given boundary.
    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        let boundary = boundary.into();
        let mut headers = Headers::new();
        headers.add(
            "Content-Type",
            ContentType::multipart_mixed(boundary.as_str()).to_string(),
        );
        headers.add("MIME-Version", "1.0");

        Self {
            headers,
            parts: Vec::new(),
            boundary,
        }
    }

    /// Appends a part.
    pub fn attach(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Returns the multipart boundary.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("to")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.headers.get("date")
    }

    /// Serializes the message to its wire form with CRLF line endings.
    ///
    /// Headers are folded, and `Subject` or any value holding a line break
    /// is RFC 2047 encoded.
    #[must_use]
    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(self.headers.to_string().as_bytes());
        out.extend_from_slice(b"\r\n");

        for part in &self.parts {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            out.extend_from_slice(part.headers.to_string().as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&part.body);
            if !part.body.ends_with(b"\r\n") {
                out.extend_from_slice(b"\r\n");
            }
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        out
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_wire()))
    }
}
