use anyhow::Result;
use clap::Args;
use wvproxy::{Endpoints, Environment, Purpose, TEST_PROVIDER};

/**
    Print the URL a request would be sent to.
*/
#[derive(Args)]
pub struct UrlCommand {
    /**
        Operation: license or key.
    */
    #[arg(long, default_value = "license")]
    purpose: Purpose,

    /**
        Provider identifier.
    */
    #[arg(short, long, default_value = TEST_PROVIDER)]
    provider: String,

    /**
        Use the Widevine Classic (/cas) services.
    */
    #[arg(long)]
    classic: bool,
}

impl UrlCommand {
    pub fn run(self) -> Result<()> {
        let endpoints = if self.classic {
            Endpoints::classic()
        } else {
            Endpoints::modular()
        };
        let environment = Environment::for_provider(&self.provider);
        println!("Environment: {environment}");
        println!("URL:         {}", endpoints.resolve(&self.provider, self.purpose));
        Ok(())
    }
}
