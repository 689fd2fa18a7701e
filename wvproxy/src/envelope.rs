/*!
    Inner messages and the signed outer envelope.

    Both operations send the same outer shape:

    ```text
    { "request": base64(json(inner)), "signature": base64(sign(json(inner))), "signer": provider }
    ```

    The signature covers the JSON bytes of the inner message, never the base64
    text in `request`.
*/

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::ALLOWED_TRACK_TYPES;
use crate::error::{DecodeStage, ProxyError, ProxyResult};
use crate::keys::{ContentKeySpec, KeyGovernor, content_key_id};
use crate::signer::Signer;

/**
    Inner message of a license request.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseMessage {
    /// Base64 of the opaque CDM challenge.
    pub payload: String,
    /// Base64 of the content id.
    pub content_id: String,
    pub provider: String,
    pub allowed_track_types: String,
    pub content_key_specs: Vec<ContentKeySpec>,
}

impl LicenseMessage {
    /**
        Build the license message for a content id, asking the governor for
        the content key. The key id is MD5 of the derived key.
    */
    pub fn new(
        content_id: &str,
        challenge: &[u8],
        provider: &str,
        governor: &dyn KeyGovernor,
    ) -> Self {
        let content_key = governor.derive_content_key(content_id.as_bytes());
        let key_id = content_key_id(&content_key);

        Self {
            payload: data_encoding::BASE64.encode(challenge),
            content_id: data_encoding::BASE64.encode(content_id.as_bytes()),
            provider: provider.to_owned(),
            allowed_track_types: ALLOWED_TRACK_TYPES.to_owned(),
            content_key_specs: vec![ContentKeySpec::from_raw(&key_id, &content_key)],
        }
    }
}

/**
    Caller-supplied policy for a content key request.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentKeyPolicy {
    pub content_id: String,
    /// Track labels such as `SD`, `HD`, `AUDIO`. Order is kept, duplicates too.
    pub tracks: Vec<String>,
    /// DRM type labels such as `WIDEVINE`.
    pub drm_types: Vec<String>,
    /// Named policy profile on the licensing service.
    pub policy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRequest {
    #[serde(rename = "type")]
    pub track_type: String,
}

/**
    Inner message of a content key request.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyMessage {
    pub content_id: String,
    pub drm_types: Vec<String>,
    pub policy: String,
    pub tracks: Vec<TrackRequest>,
}

impl From<&ContentKeyPolicy> for PolicyMessage {
    fn from(policy: &ContentKeyPolicy) -> Self {
        Self {
            content_id: data_encoding::BASE64.encode(policy.content_id.as_bytes()),
            drm_types: policy.drm_types.clone(),
            policy: policy.policy.clone(),
            tracks: policy
                .tracks
                .iter()
                .map(|t| TrackRequest {
                    track_type: t.clone(),
                })
                .collect(),
        }
    }
}

/**
    The outer envelope POSTed to the licensing service.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// Base64 of the inner message JSON.
    pub request: String,
    /// Raw signature bytes; base64 on the wire.
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
    pub signer: String,
}

impl SignedEnvelope {
    /**
        Serialize `inner`, sign the JSON bytes, and wrap both.
    */
    pub fn seal<T: Serialize>(inner: &T, signer: &Signer, provider: &str) -> ProxyResult<Self> {
        let json = serde_json::to_vec(inner).map_err(|e| ProxyError::json(DecodeStage::Request, e))?;
        let signature = signer.sign(&json);
        Ok(Self {
            request: data_encoding::BASE64.encode(&json),
            signature,
            signer: provider.to_owned(),
        })
    }

    /**
        The inner message JSON bytes, exactly as they were signed.
    */
    pub fn request_bytes(&self) -> ProxyResult<Vec<u8>> {
        data_encoding::BASE64
            .decode(self.request.as_bytes())
            .map_err(|e| ProxyError::InvalidBase64 {
                stage: DecodeStage::Request,
                message: e.to_string(),
            })
    }

    /**
        Decode the inner message.
    */
    pub fn open<T: DeserializeOwned>(&self) -> ProxyResult<T> {
        let bytes = self.request_bytes()?;
        serde_json::from_slice(&bytes).map_err(|e| ProxyError::json(DecodeStage::Request, e))
    }

    /**
        Check the signature against the decoded request bytes.
    */
    pub fn verify(&self, signer: &Signer) -> ProxyResult<bool> {
        Ok(signer.sign(&self.request_bytes()?) == self.signature)
    }

    pub fn to_json(&self) -> ProxyResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ProxyError::json(DecodeStage::Request, e))
    }
}

mod base64_bytes {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&data_encoding::BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        data_encoding::BASE64
            .decode(s.as_bytes())
            .map_err(D::Error::custom)
    }
}
