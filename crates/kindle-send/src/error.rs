//! Error types for building and sending Kindle mail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a run.
///
/// Messages leave out the underlying cause; it is reachable through
/// [`std::error::Error::source`] and reported once by the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A supported file could not be read.
    #[error("Could not read {}", .path.display())]
    UnreadableFile {
        /// Path as given on the command line.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The mail-sending program could not be started.
    #[error("Could not start mailer '{program}'")]
    MailerSpawn {
        /// Program name or path.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Talking to the mail-sending program failed.
    #[error("Could not hand the message to the mailer")]
    MailerIo(#[from] std::io::Error),

    /// Message construction failed.
    #[error("Could not build the message")]
    Mime(#[from] kindle_mime::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_cause_is_not_repeated_in_message() {
        let err = Error::UnreadableFile {
            path: PathBuf::from("book.pdf"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Could not read book.pdf");
        assert_eq!(err.source().unwrap().to_string(), "gone");

        let err = Error::MailerSpawn {
            program: "msmtp".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Could not start mailer 'msmtp'");
        assert!(!err.to_string().contains("gone"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_mime_error_keeps_cause() {
        let err = Error::from(kindle_mime::Error::InvalidHeader("bad".to_string()));
        assert_eq!(err.to_string(), "Could not build the message");
        assert!(err.source().unwrap().to_string().contains("bad"));
    }
}
