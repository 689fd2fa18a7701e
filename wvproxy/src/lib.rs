#![allow(clippy::doc_overindented_list_items)]

mod constants;
mod crypto;
mod endpoint;
mod envelope;
mod error;
mod keys;
mod proxy;
mod pssh;
mod response;
mod signer;

#[cfg(test)]
mod test_utils;

pub use self::constants::{ALLOWED_TRACK_TYPES, TEST_PROVIDER, WIDEVINE_SYSTEM_ID};
pub use self::endpoint::{Endpoints, Environment, Purpose, resolve};
pub use self::envelope::{
    ContentKeyPolicy, LicenseMessage, PolicyMessage, SignedEnvelope, TrackRequest,
};
pub use self::error::{DecodeStage, ParseError, ProxyError, ProxyResult};
pub use self::keys::{ContentKeySpec, KeyGovernor, content_key_id};
pub use self::proxy::{
    Proxy, ProxyConfig, decode_content_key_response, decode_license_response,
};
pub use self::pssh::{WidevineCencHeader, build_header, build_pssh_box};
pub use self::response::{
    ClientInfo, ContentKeyResponse, DrmSystem, LicenseId, LicenseMetadata, LicenseResponse,
    PsshData, ServiceVersionInfo, SessionState, TrackKey, TrackPssh,
};
pub use self::signer::Signer;
