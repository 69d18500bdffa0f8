//! MIME header handling.

use crate::encoding::{encode_rfc2047, fold_header};
use crate::error::{Error, Result};
use std::fmt;

/// Collection of email headers, kept in insertion order.
///
/// Lookups are case-insensitive; names keep the spelling they were added with.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value after any existing headers.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Sets a header value.
    ///
    /// The first header with that name is replaced in place and any further
    /// ones are dropped. Absent headers are appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self
            .headers
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(index) => {
                self.headers[index].1 = value;
                let mut seen = 0usize;
                self.headers.retain(|(n, _)| {
                    if n.eq_ignore_ascii_case(&name) {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.headers.push((name, value)),
        }
    }

    /// Sets a header from untrusted input.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a valid field name or the value
    /// contains line breaks.
    pub fn try_set(&mut self, name: &str, value: &str) -> Result<()> {
        validate(name, value)?;
        self.set(name, value);
        Ok(())
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Field names are printable ASCII without colons (RFC 5322 section 2.2).
fn validate(name: &str, value: &str) -> Result<()> {
    if name.is_empty() || !name.bytes().all(|b| (33..=126).contains(&b) && b != b':') {
        return Err(Error::InvalidHeader(format!("invalid field name '{name}'")));
    }
    if value.contains(['\r', '\n']) {
        return Err(Error::InvalidHeader(format!(
            "line break in value of '{name}'"
        )));
    }
    Ok(())
}

/// Writes the headers in wire form, one folded field per CRLF line.
///
/// `Subject` and any value holding a line break are RFC 2047 encoded first,
/// so a stored value can never start a header of its own.
impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            let value = if name.eq_ignore_ascii_case("subject") || value.contains(['\r', '\n']) {
                encode_rfc2047(value, "utf-8")
            } else {
                value.clone()
            };
            write!(f, "{}\r\n", fold_header(name, &value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_new() {
        let headers = Headers::new();
        assert_eq!(headers.to_string(), "");
    }

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "application/pdf");
        assert_eq!(headers.get("Content-Type"), Some("application/pdf"));
        assert_eq!(headers.get("content-type"), Some("application/pdf"));
    }

    #[test]
    fn test_headers_set_replaces_in_place() {
        let mut headers = Headers::new();
        headers.add("Date", "old");
        headers.add("To", "alice@kindle.com");
        headers.add("to", "bob@kindle.com");
        headers.add("Subject", "Transfer a.pdf");

        headers.set("TO", "carol@kindle.com");
        assert_eq!(headers.get("to"), Some("carol@kindle.com"));
        assert_eq!(
            headers.to_string(),
            "Date: old\r\nTo: carol@kindle.com\r\nSubject: Transfer a.pdf\r\n"
        );
    }

    #[test]
    fn test_headers_set_appends_when_absent() {
        let mut headers = Headers::new();
        headers.set("Subject", "Transfer a.pdf");
        headers.set("From", "me@example.com");
        assert_eq!(headers.to_string(), "Subject: Transfer a.pdf\r\nFrom: me@example.com\r\n");
    }

    #[test]
    fn test_headers_try_set_rejects_injection() {
        let mut headers = Headers::new();
        assert!(headers.try_set("To", "a@kindle.com\r\nBcc: x@example.com").is_err());
        assert!(headers.try_set("Bad Name", "value").is_err());
        assert_eq!(headers.to_string(), "");

        headers.try_set("To", "a@kindle.com").unwrap();
        assert_eq!(headers.get("to"), Some("a@kindle.com"));
    }

    #[test]
    fn test_display_encodes_line_breaks() {
        let mut headers = Headers::new();
        headers.set("Subject", "Transfer a\nBcc: spy@example.com");
        headers.add("X-Note", "one\r\ntwo");

        let wire = headers.to_string();
        assert!(wire.starts_with("Subject: =?utf-8?B?"));
        assert!(wire.contains("X-Note: =?utf-8?B?"));
        assert!(!wire.lines().any(|line| line.starts_with("Bcc:")));
        assert_eq!(wire.matches("\r\n").count(), 2);
    }

    #[test]
    fn test_display_folds_long_values() {
        let mut headers = Headers::new();
        let subject = format!("Transfer {}", ["chapter-001-of-a-long-book.pdf"; 10].join(", "));
        headers.set("Subject", subject.as_str());

        let wire = headers.to_string();
        assert!(wire.lines().count() > 1);
        for line in wire.split("\r\n") {
            assert!(line.len() <= 78, "{line}");
        }
        assert_eq!(wire.replace("\r\n ", " "), format!("Subject: {subject}\r\n"));
    }
}
