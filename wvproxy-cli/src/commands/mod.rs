mod content_key;
mod license;
mod pssh;
mod sign;
mod url;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use wvproxy::{Endpoints, KeyGovernor, Proxy, ProxyConfig, TEST_PROVIDER};

pub use self::content_key::ContentKeyCommand;
pub use self::license::LicenseCommand;
pub use self::pssh::PsshCommand;
pub use self::sign::SignCommand;
pub use self::url::UrlCommand;

/// Published partner key of the `widevine_test` account.
const TEST_KEY_HEX: &str = "1ae8ccd0e7985cc0b6203a55855a1034afc252980e970ca90e5202689f947ab9";
/// Published partner IV of the `widevine_test` account.
const TEST_IV_HEX: &str = "d58ce954203b7c9a9a9d467f59839249";

/**
    Partner credentials and service selection shared by every command
    that talks to the licensing service.
*/
#[derive(Args)]
pub struct ProxyArgs {
    /**
        Partner root key, hex. Defaults to the public test account key.
    */
    #[arg(long, default_value = TEST_KEY_HEX)]
    key: String,

    /**
        Partner root IV, hex.
    */
    #[arg(long, default_value = TEST_IV_HEX)]
    iv: String,

    /**
        Provider identifier to sign as.
    */
    #[arg(short, long, default_value = TEST_PROVIDER)]
    provider: String,

    /**
        Use the Widevine Classic (/cas) services instead of Modular (/cenc).
    */
    #[arg(long)]
    classic: bool,

    /**
        Send requests to this base URL in every environment, e.g. a local mock.
    */
    #[arg(long, conflicts_with = "classic")]
    base_url: Option<String>,

    /**
        Connect timeout in seconds.
    */
    #[arg(long, default_value_t = 5)]
    connect_timeout: u64,

    /**
        Overall request timeout in seconds.
    */
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

impl ProxyArgs {
    pub fn config(&self) -> Result<ProxyConfig> {
        let endpoints = match (&self.base_url, self.classic) {
            (Some(base), _) => Endpoints::custom(base.as_str(), base.as_str(), base.as_str()),
            (None, true) => Endpoints::classic(),
            (None, false) => Endpoints::modular(),
        };

        Ok(
            ProxyConfig::from_hex(&self.key, &self.iv, self.provider.as_str())
                .context("failed to parse partner key material")?
                .with_endpoints(endpoints)
                .with_connect_timeout(Duration::from_secs(self.connect_timeout))
                .with_timeout(Duration::from_secs(self.timeout)),
        )
    }

    pub fn proxy(&self, governor: Arc<dyn KeyGovernor>) -> Result<Proxy> {
        Proxy::new(self.config()?, governor).context("failed to set up proxy")
    }
}

/**
    Read a command-line payload: `@path` reads the file, anything else is
    taken literally.
*/
pub fn read_input(arg: &str) -> Result<Vec<u8>> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read(Path::new(path))
            .with_context(|| format!("failed to read {path}")),
        None => Ok(arg.as_bytes().to_vec()),
    }
}
