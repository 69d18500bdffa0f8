//! # kindle-mime
//!
//! MIME message generation for sending files as email attachments.
//!
//! ## Features
//!
//! - **Multipart messages**: `multipart/mixed` containers with random boundaries
//! - **Attachments**: base64 parts carrying a `Content-Disposition` filename
//! - **Encoding**: Base64 with RFC 2045 line wrapping, RFC 2047 header words,
//!   RFC 2231 filenames and header folding
//! - **Ordered headers**: headers serialize in the order they were added
//!
//! ## Quick Start
//!
//! ```ignore
//! use kindle_mime::{ContentType, Message, Part};
//!
//! let mut message = Message::multipart_mixed();
//! message.attach(Part::attachment(
//!     ContentType::new("application", "pdf"),
//!     "report.pdf",
//!     &std::fs::read("report.pdf")?,
//! ));
//! message.headers.set("Subject", "Transfer report.pdf");
//!
//! let wire = message.to_wire();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding};
