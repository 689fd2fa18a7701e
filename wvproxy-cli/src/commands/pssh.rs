use anyhow::Result;
use clap::Args;
use wvproxy::TEST_PROVIDER;

/**
    Build the Widevine CENC header and PSSH box for a title.
*/
#[derive(Args)]
pub struct PsshCommand {
    /**
        Content identifier.
    */
    #[arg(short, long)]
    content_id: String,

    /**
        Provider identifier.
    */
    #[arg(short, long, default_value = TEST_PROVIDER)]
    provider: String,
}

impl PsshCommand {
    pub fn run(self) -> Result<()> {
        let content_id = self.content_id.as_bytes();
        println!(
            "Header:    {}",
            wvproxy::build_header(&self.provider, content_id)
        );
        println!(
            "PSSH box:  {}",
            wvproxy::build_pssh_box(&self.provider, content_id)
        );
        Ok(())
    }
}
