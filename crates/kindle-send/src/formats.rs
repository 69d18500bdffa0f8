//! File formats accepted by the Kindle personal document service.

use std::collections::HashMap;
use std::fmt;

use kindle_mime::ContentType;

/// The (type, subtype) pair sent as an attachment's `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeCategory {
    /// Major type, e.g. `image`.
    pub main_type: &'static str,
    /// Minor type, e.g. `png`.
    pub sub_type: &'static str,
}

impl MimeCategory {
    const fn new(main_type: &'static str, sub_type: &'static str) -> Self {
        Self {
            main_type,
            sub_type,
        }
    }

    /// Returns the category as a MIME content type.
    #[must_use]
    pub fn content_type(self) -> ContentType {
        ContentType::new(self.main_type, self.sub_type)
    }
}

impl fmt::Display for MimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)
    }
}

/// The extension is not in the format table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{extension}' is not supported by Amazon")]
pub struct UnsupportedFormat {
    /// Extension including the leading dot, empty if the file has none.
    pub extension: String,
}

const OCTET_STREAM: MimeCategory = MimeCategory::new("application", "octet-stream");

const KINDLE_FORMATS: &[(&str, MimeCategory)] = &[
    // Amazon Kindle
    (".azw", OCTET_STREAM),
    (".azw1", OCTET_STREAM),
    (".txt", MimeCategory::new("text", "plain")),
    // Mobipocket
    (".mobi", OCTET_STREAM),
    (".prc", OCTET_STREAM),
    // Audible
    (".aa", OCTET_STREAM),
    (".aax", OCTET_STREAM),
    (".mp3", OCTET_STREAM),
    // Word
    (".doc", MimeCategory::new("application", "msword")),
    (".docx", MimeCategory::new("application", "msword")),
    (".html", MimeCategory::new("text", "html")),
    (".htm", MimeCategory::new("text", "html")),
    (".rtf", MimeCategory::new("application", "rtf")),
    (".pdf", MimeCategory::new("application", "pdf")),
    // Images
    (".gif", MimeCategory::new("image", "gif")),
    (".png", MimeCategory::new("image", "png")),
    (".bmp", MimeCategory::new("image", "bmp")),
    (".jpg", MimeCategory::new("image", "jpeg")),
    (".jpeg", MimeCategory::new("image", "jpeg")),
];

/// Immutable mapping from extension (with leading dot) to MIME category.
#[derive(Debug, Clone)]
pub struct FormatTable {
    entries: HashMap<&'static str, MimeCategory>,
}

impl FormatTable {
    /// Builds the table of formats Amazon accepts for Kindle delivery.
    #[must_use]
    pub fn kindle() -> Self {
        Self {
            entries: KINDLE_FORMATS.iter().copied().collect(),
        }
    }

    /// Looks up an extension such as `.pdf`. Matching is case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`] if the extension is not in the table.
    pub fn lookup(&self, extension: &str) -> Result<MimeCategory, UnsupportedFormat> {
        self.entries
            .get(extension)
            .copied()
            .ok_or_else(|| UnsupportedFormat {
                extension: extension.to_string(),
            })
    }

    /// Returns all entries sorted by extension.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, MimeCategory)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(e, c)| (*e, *c)).collect();
        entries.sort_unstable_by_key(|(extension, _)| *extension);
        entries
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::kindle()
    }
}

/// Splits a file name into its extension, including the dot.
///
/// A leading dot does not start an extension, so `.bashrc` has none.
#[must_use]
pub fn extension_of(filename: &str) -> &str {
    let stem_start = filename.len() - filename.trim_start_matches('.').len();
    match filename[stem_start..].rfind('.') {
        Some(index) => &filename[stem_start + index..],
        None => "",
    }
}
