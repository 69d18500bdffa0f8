//! Command line flags and their environment fallbacks.

use std::path::PathBuf;

use clap::Parser;

use crate::sender::{DEFAULT_ACCOUNT, DEFAULT_MAILER, SendRequest};

/// Sender address fallback.
pub const FROM_ENV: &str = "KINDLE_FROM_ADDRESS";
/// Kindle address fallback.
pub const TO_ENV: &str = "KINDLE_TO_ADDRESS";
/// Mail-sending program fallback.
pub const MAILER_ENV: &str = "KINDLE_MAILER";

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "kindle-send", about = "Send files to kindle email.")]
pub struct Cli {
    /// Sender of email. Defaults to $KINDLE_FROM_ADDRESS
    #[arg(short = 'f', long = "from", value_name = "ADDRESS")]
    pub from: Option<String>,

    /// Kindle email address. Defaults to $KINDLE_TO_ADDRESS
    #[arg(short = 't', long = "to", value_name = "ADDRESS")]
    pub to: Option<String>,

    /// MSMTP account used for sending
    #[arg(short = 'a', long, default_value = DEFAULT_ACCOUNT)]
    pub account: String,

    /// Send no mail
    #[arg(long)]
    pub dry_run: bool,

    /// Mail-sending program. Defaults to $KINDLE_MAILER, then msmtp
    #[arg(long, value_name = "PROGRAM")]
    pub mailer: Option<String>,

    /// Print the supported file extensions and exit
    #[arg(long)]
    pub list_formats: bool,

    /// Files to send
    #[arg(value_name = "FILE", required_unless_present = "list_formats")]
    pub files: Vec<PathBuf>,
}

/// An address that is set neither by flag nor by environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAddress {
    /// No `--from` and no `$KINDLE_FROM_ADDRESS`.
    Sender,
    /// No `--to` and no `$KINDLE_TO_ADDRESS`.
    Recipient,
}

impl MissingAddress {
    /// Remediation hint for the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Sender => "No sender specified. Use --from or $KINDLE_FROM_ADDRESS.",
            Self::Recipient => {
                "No kindle email address specified. Use --to or $KINDLE_TO_ADDRESS."
            }
        }
    }
}

impl std::fmt::Display for MissingAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MissingAddress {}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// What to send and where.
    pub request: SendRequest,
    /// Mail-sending program.
    pub mailer: String,
}

/// Returns the flag value, else the environment variable. Empty values
/// count as unset.
#[must_use]
pub fn resolve(flag: Option<String>, var: &str) -> Option<String> {
    resolve_with(flag, var, |name| std::env::var(name).ok())
}

/// Like [`resolve`], reading the environment through `lookup`.
pub fn resolve_with(
    flag: Option<String>,
    var: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    flag.filter(|value| !value.is_empty())
        .or_else(|| lookup(var).filter(|value| !value.is_empty()))
}

impl Cli {
    /// Resolves the flags against the process environment.
    ///
    /// # Errors
    ///
    /// Returns every address that could not be resolved.
    pub fn into_config(self) -> Result<RunConfig, Vec<MissingAddress>> {
        self.into_config_with(|name| std::env::var(name).ok())
    }

    /// Resolves the flags, reading the environment through `lookup`.
    ///
    /// No file is touched here.
    ///
    /// # Errors
    ///
    /// Returns every address that could not be resolved.
    pub fn into_config_with(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<RunConfig, Vec<MissingAddress>> {
        let from = resolve_with(self.from, FROM_ENV, &lookup);
        let to = resolve_with(self.to, TO_ENV, &lookup);
        let mailer =
            resolve_with(self.mailer, MAILER_ENV, &lookup).unwrap_or_else(|| DEFAULT_MAILER.to_string());

        match (from, to) {
            (Some(from), Some(to)) => Ok(RunConfig {
                request: SendRequest {
                    from,
                    to,
                    files: self.files,
                    account: self.account,
                    send: !self.dry_run,
                },
                mailer,
            }),
            (from, to) => {
                let mut missing = Vec::new();
                if from.is_none() {
                    missing.push(MissingAddress::Sender);
                }
                if to.is_none() {
                    missing.push(MissingAddress::Recipient);
                }
                Err(missing)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_prefers_flag() {
        let vars = env(&[(FROM_ENV, "env@example.com")]);
        let lookup = |name: &str| vars.get(name).cloned();
        assert_eq!(
            resolve_with(Some("flag@example.com".into()), FROM_ENV, &lookup),
            Some("flag@example.com".to_string())
        );
        assert_eq!(
            resolve_with(None, FROM_ENV, &lookup),
            Some("env@example.com".to_string())
        );
        assert_eq!(resolve_with(None, TO_ENV, &lookup), None);
    }

    #[test]
    fn test_resolve_ignores_empty_values() {
        let vars = env(&[(TO_ENV, "")]);
        let lookup = |name: &str| vars.get(name).cloned();
        assert_eq!(resolve_with(Some(String::new()), TO_ENV, &lookup), None);
    }

    #[test]
    fn test_resolve_process_environment() {
        let unset = "KINDLE_SEND_TEST_NEVER_SET";
        assert_eq!(resolve(Some("flag".into()), unset), Some("flag".to_string()));
        assert_eq!(resolve(None, unset), None);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["kindle-send", "-f", "me@example.com", "-t", "me@kindle.com", "a.pdf"])
            .unwrap();
        let config = cli.into_config_with(|_| None).unwrap();

        assert_eq!(config.request.account, "default");
        assert!(config.request.send);
        assert_eq!(config.mailer, "msmtp");
        assert_eq!(config.request.files, vec![PathBuf::from("a.pdf")]);
    }

    #[test]
    fn test_flags_and_environment() {
        let cli = Cli::try_parse_from([
            "kindle-send",
            "--account",
            "gmail",
            "--dry-run",
            "--mailer",
            "/usr/local/bin/msmtp",
            "a.pdf",
            "b.mobi",
        ])
        .unwrap();
        let vars = env(&[
            (FROM_ENV, "env@example.com"),
            (TO_ENV, "env@free.kindle.com"),
            (MAILER_ENV, "ignored"),
        ]);
        let config = cli.into_config_with(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.request.from, "env@example.com");
        assert_eq!(config.request.to, "env@free.kindle.com");
        assert_eq!(config.request.account, "gmail");
        assert!(!config.request.send);
        assert_eq!(config.mailer, "/usr/local/bin/msmtp");
        assert_eq!(config.request.files.len(), 2);
    }

    #[test]
    fn test_missing_both_addresses() {
        let cli = Cli::try_parse_from(["kindle-send", "a.pdf"]).unwrap();
        let missing = cli.into_config_with(|_| None).unwrap_err();
        assert_eq!(missing, vec![MissingAddress::Sender, MissingAddress::Recipient]);
    }

    #[test]
    fn test_missing_recipient_only() {
        let cli = Cli::try_parse_from(["kindle-send", "--from", "me@example.com", "a.pdf"]).unwrap();
        let missing = cli.into_config_with(|_| None).unwrap_err();
        assert_eq!(missing, vec![MissingAddress::Recipient]);
        assert_eq!(
            missing[0].to_string(),
            "No kindle email address specified. Use --to or $KINDLE_TO_ADDRESS."
        );
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["kindle-send", "-f", "a@b.c", "-t", "x@kindle.com"]).is_err());
        assert!(Cli::try_parse_from(["kindle-send", "--list-formats"]).is_ok());
    }
}
