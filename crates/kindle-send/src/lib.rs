//! # kindle-send
//!
//! Sends documents to a Kindle email address.
//!
//! Files are checked against the formats Amazon accepts, attached to a
//! `multipart/mixed` mail as base64 parts, and piped into an msmtp-compatible
//! program for delivery.
//!
//! ## Example
//!
//! ```ignore
//! use kindle_send::{FormatTable, MsmtpMailer, SendRequest, send};
//!
//! let request = SendRequest {
//!     from: "me@example.com".into(),
//!     to: "me@kindle.com".into(),
//!     files: vec!["book.mobi".into()],
//!     account: "default".into(),
//!     send: true,
//! };
//! send(&request, &FormatTable::kindle(), &MsmtpMailer::default())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
mod error;
pub mod formats;
pub mod sender;

pub use builder::{BuildOutcome, Rejected, build_message};
pub use config::{Cli, MissingAddress, RunConfig, resolve, resolve_with};
pub use error::{Error, Result};
pub use formats::{FormatTable, MimeCategory, UnsupportedFormat};
pub use sender::{Mailer, MsmtpMailer, SendOutcome, SendRequest, is_kindle_address, send};
