use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use wvproxy::ContentKeyPolicy;

use super::ProxyArgs;
use crate::governor::FixedKeyGovernor;

/**
    Request content keys for a title.
*/
#[derive(Args)]
pub struct ContentKeyCommand {
    #[command(flatten)]
    proxy: ProxyArgs,

    /**
        Content identifier to request keys for.
    */
    #[arg(short, long)]
    content_id: String,

    /**
        Track label. Can be repeated; order is kept.
    */
    #[arg(short, long = "track", default_values = ["SD", "HD", "AUDIO"])]
    tracks: Vec<String>,

    /**
        DRM type label. Can be repeated.
    */
    #[arg(short, long = "drm-type", default_values = ["WIDEVINE"])]
    drm_types: Vec<String>,

    /**
        Policy profile name on the licensing service.
    */
    #[arg(long, default_value = "default")]
    policy: String,
}

impl ContentKeyCommand {
    pub async fn run(self) -> Result<()> {
        let proxy = self
            .proxy
            .proxy(Arc::new(FixedKeyGovernor::new(Vec::new())))?;

        let policy = ContentKeyPolicy {
            content_id: self.content_id.clone(),
            tracks: self.tracks,
            drm_types: self.drm_types,
            policy: self.policy,
        };

        eprintln!(
            "Sending content key request to {}",
            proxy.url(wvproxy::Purpose::ContentKey)
        );
        let response = proxy
            .get_content_key(&self.content_id, &policy)
            .await
            .context("content key request failed")?;

        eprintln!("Status: {}", response.status);
        if response.already_used {
            eprintln!("Content id was already used; keys are the existing ones.");
        }
        println!("{}", serde_json::to_string_pretty(&response)?);
        Ok(())
    }
}
