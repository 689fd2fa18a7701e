use anyhow::{Context, Result};
use clap::Args;

use super::read_input;

/**
    Sign a payload with the partner root key.
*/
#[derive(Args)]
pub struct SignCommand {
    /**
        Partner root key, hex.
    */
    #[arg(long, default_value = super::TEST_KEY_HEX)]
    key: String,

    /**
        Partner root IV, hex.
    */
    #[arg(long, default_value = super::TEST_IV_HEX)]
    iv: String,

    /**
        Payload to sign, or @path to read it from a file.
    */
    payload: String,
}

impl SignCommand {
    pub fn run(self) -> Result<()> {
        let key = hex::decode(self.key.trim()).context("key is not hex")?;
        let iv = hex::decode(self.iv.trim()).context("IV is not hex")?;
        let signer = wvproxy::Signer::new(&key, &iv).context("invalid key material")?;

        let payload = read_input(&self.payload)?;
        println!("{}", data_encoding::BASE64.encode(&signer.sign(&payload)));
        Ok(())
    }
}
