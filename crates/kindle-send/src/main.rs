//! `kindle-send` - mail documents to a Kindle through msmtp.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use kindle_send::{Cli, FormatTable, MsmtpMailer, send};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout is reserved for user notices.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let formats = FormatTable::kindle();

    if cli.list_formats {
        for (extension, category) in formats.entries() {
            println!("{extension:<6} {category}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(missing) => {
            for address in missing {
                println!("{}", address.message());
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    debug!(?config, "resolved configuration");

    let mailer = MsmtpMailer::new(config.mailer);
    let outcome = send(&config.request, &formats, &mailer)?;
    debug!(?outcome, "done");

    Ok(ExitCode::SUCCESS)
}
