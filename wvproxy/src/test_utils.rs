use std::collections::HashMap;

use hex_literal::hex;

use crate::error::ProxyResult;
use crate::keys::{ContentKeySpec, KeyGovernor, content_key_id};

/// Published partner key material for the `widevine_test` provider.
pub const TEST_KEY: [u8; 32] =
    hex!("1ae8ccd0e7985cc0b6203a55855a1034afc252980e970ca90e5202689f947ab9");
pub const TEST_IV: [u8; 16] = hex!("d58ce954203b7c9a9a9d467f59839249");

/// Governor that hands out the same key for every title.
pub struct FixedKeyGovernor {
    key: Vec<u8>,
}

impl FixedKeyGovernor {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }
}

impl KeyGovernor for FixedKeyGovernor {
    fn derive_content_key(&self, _content_id: &[u8]) -> Vec<u8> {
        self.key.clone()
    }

    fn derive_content_key_id(&self, content_id: &[u8]) -> Vec<u8> {
        content_key_id(content_id).to_vec()
    }

    fn derive_content_iv(&self, _content_id: &[u8]) -> Vec<u8> {
        vec![0; 16]
    }

    fn derive_key_specs(
        &self,
        content_id: &[u8],
        _policy_config: &HashMap<String, String>,
    ) -> ProxyResult<Vec<ContentKeySpec>> {
        Ok(vec![
            ContentKeySpec::from_raw(&self.derive_content_key_id(content_id), &self.key)
                .with_iv(&self.derive_content_iv(content_id))
                .with_track_type("SD"),
        ])
    }
}
