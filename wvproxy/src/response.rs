/*!
    Typed decodings of licensing service replies.

    Every field defaults when the service leaves it out. Only `status` is
    meaningful to this crate's callers (`"OK"` on success); the rest is passed
    through untouched.
*/

use serde::{Deserialize, Serialize};

/**
    Reply to a license request (`/getlicense`).
*/
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseResponse {
    pub status: String,
    pub status_message: String,
    /// Base64 license blob for the CDM.
    pub license: String,
    pub license_metadata: LicenseMetadata,
    pub supported_tracks: Vec<serde_json::Value>,
    pub make: String,
    pub model: String,
    pub security_level: i64,
    pub internal_status: i64,
    pub session_state: SessionState,
    pub drm_cert_serial_number: String,
    pub device_whitelist_state: String,
    pub message_type: String,
    pub platform: String,
    pub device_state: String,
    pub pssh_data: PsshData,
    pub client_max_hdcp_version: String,
    pub client_info: Vec<ClientInfo>,
    pub signature_expiration_secs: i64,
    pub platform_verification_status: String,
    pub content_owner: String,
    pub content_provider: String,
    pub system_id: i64,
    pub oem_crypto_api_version: i64,
    pub resource_rating_tier: i64,
    pub service_version_info: ServiceVersionInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseMetadata {
    pub content_id: String,
    pub license_type: String,
    pub request_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub license_id: LicenseId,
    pub signing_key: String,
    pub keybox_system_id: i64,
    pub license_counter: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseId {
    pub request_id: String,
    pub session_id: String,
    pub purchase_id: String,
    #[serde(rename = "type")]
    pub license_type: String,
    pub version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsshData {
    pub key_id: Vec<serde_json::Value>,
    pub content_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceVersionInfo {
    pub license_sdk_version: String,
    pub license_service_version: String,
}

/**
    Reply to a content key request (`/getcontentkey`), after unwrapping the
    base64 `response` field.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentKeyResponse {
    pub status: String,
    pub drm: Vec<DrmSystem>,
    pub tracks: Vec<TrackKey>,
    pub already_used: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrmSystem {
    #[serde(rename = "type")]
    pub drm_type: String,
    pub system_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackKey {
    #[serde(rename = "type")]
    pub track_type: String,
    pub key_id: String,
    pub key: String,
    pub pssh: Vec<TrackPssh>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackPssh {
    pub drm_type: String,
    pub data: String,
}
