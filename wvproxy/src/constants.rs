/*
    Widevine cloud licensing hosts.

    Modular (CENC) services live under `/cenc`, the legacy Classic product
    line under `/cas`.
*/

pub const UAT_HOST: &str = "https://license.uat.widevine.com";
pub const STAGING_HOST: &str = "https://license.staging.widevine.com";
pub const PRODUCTION_HOST: &str = "https://license.widevine.com";

pub const MODULAR_PREFIX: &str = "cenc";
pub const CLASSIC_PREFIX: &str = "cas";

/**
    Provider identifier of Widevine's public test account.

    Selects the UAT environment, and is also the final path segment of every
    resolved URL regardless of the configured provider.
*/
pub const TEST_PROVIDER: &str = "widevine_test";

/**
    `allowed_track_types` marker sent with every license message.
*/
pub const ALLOWED_TRACK_TYPES: &str = "SD_UHD1";

/**
    Widevine DRM system ID (EDEF8BA9-79D6-4ACE-A3C8-27DCD51D21ED).
*/
pub const WIDEVINE_SYSTEM_ID: [u8; 16] = [
    0xED, 0xEF, 0x8B, 0xA9, 0x79, 0xD6, 0x4A, 0xCE, 0xA3, 0xC8, 0x27, 0xDC, 0xD5, 0x1D, 0x21, 0xED,
];
