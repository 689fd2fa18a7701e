use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use super::{ProxyArgs, read_input};
use crate::governor::FixedKeyGovernor;

/**
    Request a license for a CDM challenge.
*/
#[derive(Args)]
pub struct LicenseCommand {
    #[command(flatten)]
    proxy: ProxyArgs,

    /**
        Content identifier the license is for.
    */
    #[arg(short, long)]
    content_id: String,

    /**
        Base64-encoded license challenge, or @path to a raw challenge file.
    */
    #[arg(long)]
    challenge: String,

    /**
        Content key to provision, hex. Empty by default.
    */
    #[arg(long, default_value = "")]
    content_key: String,
}

impl LicenseCommand {
    pub async fn run(self) -> Result<()> {
        let challenge = if self.challenge.starts_with('@') {
            read_input(&self.challenge)?
        } else {
            data_encoding::BASE64
                .decode(self.challenge.trim().as_bytes())
                .context("challenge is not valid base64")?
        };
        let content_key = hex::decode(&self.content_key).context("content key is not hex")?;

        let proxy = self
            .proxy
            .proxy(Arc::new(FixedKeyGovernor::new(content_key)))?;

        eprintln!("Sending license request to {}", proxy.url(wvproxy::Purpose::License));
        let response = proxy
            .get_license(&self.content_id, &challenge)
            .await
            .context("license request failed")?;

        eprintln!("Status: {}", response.status);
        println!("{}", serde_json::to_string_pretty(&response)?);
        Ok(())
    }
}
