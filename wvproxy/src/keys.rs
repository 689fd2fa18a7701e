use std::collections::HashMap;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::error::ProxyResult;

/**
    One content key to provision, with raw key material base64-encoded.

    `iv` and `track_type` are omitted from the JSON when unset.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentKeySpec {
    pub key_id: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_type: Option<String>,
}

impl ContentKeySpec {
    /**
        Build a spec from raw key id and key bytes.
    */
    pub fn from_raw(key_id: &[u8], key: &[u8]) -> Self {
        Self {
            key_id: data_encoding::BASE64.encode(key_id),
            key: data_encoding::BASE64.encode(key),
            iv: None,
            track_type: None,
        }
    }

    pub fn with_iv(mut self, iv: &[u8]) -> Self {
        self.iv = Some(data_encoding::BASE64.encode(iv));
        self
    }

    pub fn with_track_type(mut self, track_type: impl Into<String>) -> Self {
        self.track_type = Some(track_type.into());
        self
    }
}

/**
    Pluggable key governance: decides which content keys protect a title.

    Implementations live outside this crate and are bound to a
    [`Proxy`](crate::Proxy) at construction. Only `derive_content_key` is
    consulted by the license path; the other operations complete the
    capability for integrators that provision keys themselves.
*/
pub trait KeyGovernor: Send + Sync {
    /// Content key for a content id.
    fn derive_content_key(&self, content_id: &[u8]) -> Vec<u8>;

    /// Key id for a content id.
    fn derive_content_key_id(&self, content_id: &[u8]) -> Vec<u8>;

    /// Initialization vector for a content id.
    fn derive_content_iv(&self, content_id: &[u8]) -> Vec<u8>;

    /// Full key spec list for a content id under a policy configuration.
    fn derive_key_specs(
        &self,
        content_id: &[u8],
        policy_config: &HashMap<String, String>,
    ) -> ProxyResult<Vec<ContentKeySpec>>;
}

/**
    Key id sent alongside a derived content key: MD5 of the key bytes.

    MD5 only shortens the key to a 16-byte identifier here; collisions are
    tolerable.
*/
pub fn content_key_id(key: &[u8]) -> [u8; 16] {
    Md5::digest(key).into()
}
