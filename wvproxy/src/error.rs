use std::fmt;

use thiserror::Error;

/**
    Which layer of an exchange a JSON or base64 failure happened in.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStage {
    /// Serializing an inner message or the outer envelope.
    Request,
    /// The single-layer license response body.
    LicenseResponse,
    /// The outer `{"response": ...}` body of a content key exchange.
    TransportBody,
    /// The payload carried inside the `response` field.
    InnerResponse,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Request => "request",
            Self::LicenseResponse => "license response",
            Self::TransportBody => "content key transport body",
            Self::InnerResponse => "content key inner response",
        })
    }
}

/**
    Errors from building, signing, sending, or decoding a proxy request.
*/
#[derive(Debug, Clone, Error)]
pub enum ProxyError {
    // ── Transport ─────────────────────────────────────────────────────
    #[error("HTTP transport failed: {0}")]
    Transport(String),

    // ── Encoding ──────────────────────────────────────────────────────
    #[error("JSON error in {stage}: {message}")]
    Json {
        stage: DecodeStage,
        message: String,
    },
    #[error("invalid base64 in {stage}: {message}")]
    InvalidBase64 {
        stage: DecodeStage,
        message: String,
    },
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    // ── Protocol ──────────────────────────────────────────────────────
    #[error("content key response is empty (no `response` field)")]
    EmptyResponse,

    // ── Crypto ────────────────────────────────────────────────────────
    #[error("signer rejected key material: {0}")]
    Crypto(String),
}

impl ProxyError {
    pub(crate) fn json(stage: DecodeStage, e: serde_json::Error) -> Self {
        Self::Json {
            stage,
            message: e.to_string(),
        }
    }

    /**
        The stage a decode failure belongs to, if this is a decode failure.
    */
    pub fn stage(&self) -> Option<DecodeStage> {
        match self {
            Self::Json { stage, .. } | Self::InvalidBase64 { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<hex::FromHexError> for ProxyError {
    fn from(e: hex::FromHexError) -> Self {
        Self::InvalidHex(e.to_string())
    }
}

/**
    Type alias for results that may return a [`ProxyError`].
*/
pub type ProxyResult<T> = std::result::Result<T, ProxyError>;

/**
    Error returned by `FromStr` implementations on enum types.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}
