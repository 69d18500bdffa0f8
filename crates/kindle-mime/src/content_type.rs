//! MIME content type handling.

use crate::error::{Error, Result};
use std::fmt;

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "jpeg").
    pub sub_type: String,
    /// Parameters in the order they were added (e.g., boundary=xxx).
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a multipart/mixed content type with boundary.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "mixed").with_parameter("boundary", boundary)
    }

    /// Adds a parameter, replacing an existing one with the same name.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into().to_lowercase();
        let value = value.into();
        match self.parameters.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.parameters.push((key, value)),
        }
        self
    }

    /// Returns a parameter value by name.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Returns `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2=value2`
    ///
    /// # Errors
    ///
    /// Returns an error if the type or subtype is missing.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let type_str = parts.next().unwrap_or_default().trim();
        let (main_type, sub_type) = type_str
            .split_once('/')
            .ok_or_else(|| Error::InvalidContentType(format!("Missing subtype in '{s}'")))?;

        let (main_type, sub_type) = (main_type.trim(), sub_type.trim());
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(Error::InvalidContentType(format!("Empty type in '{s}'")));
        }

        let mut content_type = Self::new(main_type.to_lowercase(), sub_type.to_lowercase());

        for param in parts {
            if let Some((key, value)) = param.trim().split_once('=') {
                content_type = content_type.with_parameter(key.trim(), value.trim().trim_matches('"'));
            }
        }

        Ok(content_type)
    }
}

/// Whether a parameter value has to be quoted (RFC 2045 tspecials).
fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c))
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.main_type;
        let sub = &self.sub_type;
        write!(f, "{main}/{sub}")?;

        for (key, value) in &self.parameters {
            if needs_quoting(value) {
                write!(f, "; {key}=\"{value}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_new() {
        let ct = ContentType::new("image", "png");
        assert_eq!(ct.main_type, "image");
        assert_eq!(ct.sub_type, "png");
        assert!(ct.parameters.is_empty());
        assert_eq!(ct.to_string(), "image/png");
    }

    #[test]
    fn test_multipart_mixed() {
        let ct = ContentType::multipart_mixed("===============123==");
        assert_eq!(ct.essence(), "multipart/mixed");
        assert_eq!(ct.boundary(), Some("===============123=="));
        assert_eq!(
            ct.to_string(),
            "multipart/mixed; boundary=\"===============123==\""
        );
    }

    #[test]
    fn test_parameters_keep_order() {
        let ct = ContentType::new("text", "plain")
            .with_parameter("charset", "utf-8")
            .with_parameter("format", "flowed")
            .with_parameter("charset", "us-ascii");

        assert_eq!(ct.to_string(), "text/plain; charset=us-ascii; format=flowed");
    }

    #[test]
    fn test_content_type_parse() {
        let ct = ContentType::parse("Application/PDF").unwrap();
        assert_eq!(ct.essence(), "application/pdf");

        let ct = ContentType::parse("multipart/mixed; boundary=\"==abc==\"").unwrap();
        assert_eq!(ct.boundary(), Some("==abc=="));
    }

    #[test]
    fn test_content_type_parse_invalid() {
        assert!(ContentType::parse("pdf").is_err());
        assert!(ContentType::parse("/pdf").is_err());
    }
}
