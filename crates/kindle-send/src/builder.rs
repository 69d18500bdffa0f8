//! Assembles the multipart mail carrying the accepted attachments.

use std::path::{Path, PathBuf};

use chrono::Local;
use kindle_mime::{Message, Part};
use tracing::debug;

use crate::error::{Error, Result};
use crate::formats::{FormatTable, UnsupportedFormat, extension_of};

/// A file that was skipped because of its extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// Path as given by the caller.
    pub path: PathBuf,
    /// Why it was rejected.
    pub reason: UnsupportedFormat,
}

/// Result of running the builder over a list of paths.
#[derive(Debug)]
pub struct BuildOutcome {
    /// The composed message, absent when no file was accepted.
    pub message: Option<Message>,
    /// Accepted file names, in input order.
    pub accepted: Vec<String>,
    /// Skipped files, in input order.
    pub rejected: Vec<Rejected>,
}

/// Builds the `Subject` for a list of accepted file names.
#[must_use]
pub fn subject_for(filenames: &[String]) -> String {
    format!("Transfer {}", filenames.join(", "))
}

/// Returns everything after the last path separator.
///
/// A path ending in a separator has an empty base name, and `.` or `..`
/// are returned as written.
fn base_name(path: &Path) -> String {
    path.to_string_lossy()
        .rsplit(std::path::is_separator)
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Attaches every supported file in `paths`, in order.
///
/// Unsupported files are reported and skipped. If nothing is accepted a
/// notice is printed and the outcome carries no message.
///
/// # Errors
///
/// Returns [`Error::UnreadableFile`] if a supported file cannot be read.
pub fn build_message<P: AsRef<Path>>(paths: &[P], formats: &FormatTable) -> Result<BuildOutcome> {
    let mut message = Message::multipart_mixed();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let filename = base_name(path);
        let extension = extension_of(&filename);

        let category = match formats.lookup(extension) {
            Ok(category) => category,
            Err(reason) => {
                println!(
                    "Could not prepare {} for sending. {reason}",
                    path.display()
                );
                debug!(path = %path.display(), extension, "skipping unsupported file");
                rejected.push(Rejected {
                    path: path.to_path_buf(),
                    reason,
                });
                continue;
            }
        };

        let data = std::fs::read(path).map_err(|source| Error::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(file = %filename, %category, bytes = data.len(), "attaching");

        message.attach(Part::attachment(category.content_type(), &filename, &data));
        accepted.push(filename);
    }

    if accepted.is_empty() {
        println!("No file was accepted.");
        return Ok(BuildOutcome {
            message: None,
            accepted,
            rejected,
        });
    }

    message.headers.set("Date", Local::now().to_rfc2822());
    message.headers.set("Subject", subject_for(&accepted));

    Ok(BuildOutcome {
        message: Some(message),
        accepted,
        rejected,
    })
}
