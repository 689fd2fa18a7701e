use prost::Message;

use crate::constants::WIDEVINE_SYSTEM_ID;

/**
    The Widevine CENC header record carried in PSSH data.

    Only the fields this client fills are declared; tags match the published
    `WidevineCencHeader` schema so other decoders read it unchanged.
*/
#[derive(Clone, PartialEq, Message)]
pub struct WidevineCencHeader {
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub key_id: Vec<Vec<u8>>,
    #[prost(string, optional, tag = "3")]
    pub provider: Option<String>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub content_id: Option<Vec<u8>>,
}

impl WidevineCencHeader {
    pub fn new(provider: &str, content_id: &[u8]) -> Self {
        Self {
            key_id: Vec::new(),
            provider: Some(provider.to_owned()),
            content_id: Some(content_id.to_vec()),
        }
    }
}

/**
    Base64 of the serialized CENC header for a provider and content id.
*/
pub fn build_header(provider: &str, content_id: &[u8]) -> String {
    let header = WidevineCencHeader::new(provider, content_id);
    data_encoding::BASE64.encode(&header.encode_to_vec())
}

/**
    Base64 of a version 0 ISOBMFF `pssh` box wrapping the CENC header.

    Layout:
      [0..4]    box_size: u32 big-endian
      [4..8]    box_type: "pssh"
      [8]       version: 0
      [9..12]   flags: 0
      [12..28]  system_id: Widevine
      [28..32]  data_size: u32 big-endian
      [32..]    data: serialized CENC header
*/
pub fn build_pssh_box(provider: &str, content_id: &[u8]) -> String {
    let data = WidevineCencHeader::new(provider, content_id).encode_to_vec();
    let size = 32 + data.len();

    let mut buf = Vec::with_capacity(size);
    buf.extend_from_slice(&(size as u32).to_be_bytes());
    buf.extend_from_slice(b"pssh");
    buf.push(0);
    buf.extend_from_slice(&[0u8; 3]);
    buf.extend_from_slice(&WIDEVINE_SYSTEM_ID);
    buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
    buf.extend_from_slice(&data);

    data_encoding::BASE64.encode(&buf)
}
