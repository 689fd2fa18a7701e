use std::collections::HashMap;

use wvproxy::{ContentKeySpec, KeyGovernor, ProxyResult, content_key_id};

/**
    Key governor that hands out one operator-supplied key for every title.

    Good enough for exercising the service from the command line; real
    deployments derive a key per title.
*/
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

    fn derive_content_key_id(&self, _content_id: &[u8]) -> Vec<u8> {
        content_key_id(&self.key).to_vec()
    }

    fn derive_content_iv(&self, _content_id: &[u8]) -> Vec<u8> {
        Vec::new()
    }

    fn derive_key_specs(
        &self,
        content_id: &[u8],
        _policy_config: &HashMap<String, String>,
    ) -> ProxyResult<Vec<ContentKeySpec>> {
        Ok(vec![ContentKeySpec::from_raw(
            &self.derive_content_key_id(content_id),
            &self.key,
        )])
    }
}
