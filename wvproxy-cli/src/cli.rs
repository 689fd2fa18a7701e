use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{
    ContentKeyCommand, LicenseCommand, PsshCommand, SignCommand, UrlCommand,
};

/**
    Widevine cloud licensing proxy client.
*/
#[derive(Parser)]
#[command(name = "wvproxy")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "debug", "wvproxy=trace").
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request a license for a CDM challenge.
    License(LicenseCommand),
    /// Request content keys for a title.
    ContentKey(ContentKeyCommand),
    /// Sign a payload with the partner root key.
    Sign(SignCommand),
    /// Build the Widevine CENC header and PSSH box for a title.
    Pssh(PsshCommand),
    /// Print the URL a request would be sent to.
    Url(UrlCommand),
}

impl Cli {
    pub fn init_logging(&self) {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(&self.log_level)),
            )
            .init();
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::License(cmd) => cmd.run().await,
            Command::ContentKey(cmd) => cmd.run().await,
            Command::Sign(cmd) => cmd.run(),
            Command::Pssh(cmd) => cmd.run(),
            Command::Url(cmd) => cmd.run(),
        }
    }
}
