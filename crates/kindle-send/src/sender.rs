//! Hands the composed mail to the mail-sending program.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::builder::build_message;
use crate::error::{Error, Result};
use crate::formats::FormatTable;

/// Mail-sending program used when none is configured.
pub const DEFAULT_MAILER: &str = "msmtp";

/// Account passed to the mailer when none is configured.
pub const DEFAULT_ACCOUNT: &str = "default";

const KINDLE_DOMAINS: [&str; 2] = ["@kindle.com", "@free.kindle.com"];

/// Everything needed for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    /// Sender address.
    pub from: String,
    /// Kindle address.
    pub to: String,
    /// Files to attach, in order.
    pub files: Vec<PathBuf>,
    /// Mailer account to send through.
    pub account: String,
    /// False for a dry run.
    pub send: bool,
}

/// Which path a run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The message was handed to the mailer.
    Sent,
    /// A message was built but sending was disabled.
    DryRun,
    /// No file was accepted, so there was nothing to send.
    NothingAccepted,
}

/// Delivers a serialized message.
pub trait Mailer {
    /// Sends `message` to `to` using the given mailer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed off.
    fn deliver(&self, account: &str, to: &str, message: &[u8]) -> Result<()>;
}

/// Pipes messages into an msmtp-compatible program.
///
/// Invoked as `<program> --account=<account> <to>` with the message on stdin.
#[derive(Debug, Clone)]
pub struct MsmtpMailer {
    program: String,
}

impl MsmtpMailer {
    /// Creates a mailer running `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for MsmtpMailer {
    fn default() -> Self {
        Self::new(DEFAULT_MAILER)
    }
}

impl Mailer for MsmtpMailer {
    fn deliver(&self, account: &str, to: &str, message: &[u8]) -> Result<()> {
        let mut child = Command::new(&self.program)
            .arg(format!("--account={account}"))
            .arg(to)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| Error::MailerSpawn {
                program: self.program.clone(),
                source,
            })?;
        debug!(program = %self.program, pid = child.id(), "mailer started");

        // Dropping stdin at the end of this block signals end of message.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(message) {
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    warn!(program = %self.program, "mailer closed its input early");
                }
                other => other?,
            }
        }

        // Exit status is not checked; the mailer reports its own failures.
        let status = child.wait()?;
        debug!(program = %self.program, %status, "mailer exited");
        Ok(())
    }
}

/// Whether the address belongs to a Kindle delivery domain.
///
/// The suffix match is case-sensitive.
#[must_use]
pub fn is_kindle_address(address: &str) -> bool {
    KINDLE_DOMAINS.iter().any(|domain| address.ends_with(domain))
}

/// Builds the mail for `request.files` and hands it to `mailer`.
///
/// A non-Kindle recipient only produces a warning.
///
/// # Errors
///
/// Returns an error if a supported file cannot be read, the addresses are
/// not valid header values, or the mailer fails to start.
pub fn send(request: &SendRequest, formats: &FormatTable, mailer: &dyn Mailer) -> Result<SendOutcome> {
    let outcome = build_message(request.files.as_slice(), formats)?;

    if !is_kindle_address(&request.to) {
        println!("Warning: Specified receiver is not a kindle address.");
        debug!(to = %request.to, "receiver is not a kindle address");
    }

    let Some(mut message) = outcome.message else {
        println!("No mail will be sent.");
        return Ok(SendOutcome::NothingAccepted);
    };

    let subject = message.subject().unwrap_or_default().to_string();

    if !request.send {
        println!("Dry run: would send {subject}.");
        println!("No mail will be sent.");
        return Ok(SendOutcome::DryRun);
    }

    message.headers.try_set("From", &request.from)?;
    message.headers.try_set("To", &request.to)?;

    println!("Sending: {subject}.");
    info!(account = %request.account, to = %request.to, parts = message.parts.len(), "sending");
    mailer.deliver(&request.account, &request.to, &message.to_wire())?;

    Ok(SendOutcome::Sent)
}
