use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::endpoint::{Endpoints, Purpose};
use crate::envelope::{ContentKeyPolicy, LicenseMessage, PolicyMessage, SignedEnvelope};
use crate::error::{DecodeStage, ProxyError, ProxyResult};
use crate::keys::KeyGovernor;
use crate::pssh::build_header;
use crate::response::{ContentKeyResponse, LicenseResponse};
use crate::signer::Signer;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/**
    Partner credentials and transport settings for a [`Proxy`].
*/
#[derive(Clone)]
pub struct ProxyConfig {
    /// Partner root key (16, 24 or 32 bytes).
    pub root_key: Vec<u8>,
    /// Partner root IV (one AES block).
    pub root_iv: Vec<u8>,
    /// Provider identifier; also the envelope `signer`.
    pub provider: String,
    pub endpoints: Endpoints,
    pub connect_timeout: Duration,
    /// Bound on the whole exchange, connect included.
    pub timeout: Duration,
}

impl ProxyConfig {
    pub fn new(
        root_key: impl Into<Vec<u8>>,
        root_iv: impl Into<Vec<u8>>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            root_key: root_key.into(),
            root_iv: root_iv.into(),
            provider: provider.into(),
            endpoints: Endpoints::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /**
        Same as [`ProxyConfig::new`] with key and IV given as hex strings.
    */
    pub fn from_hex(
        root_key_hex: &str,
        root_iv_hex: &str,
        provider: impl Into<String>,
    ) -> ProxyResult<Self> {
        let key = hex::decode(root_key_hex.trim())?;
        let iv = hex::decode(root_iv_hex.trim())?;
        Ok(Self::new(key, iv, provider))
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("provider", &self.provider)
            .field("endpoints", &self.endpoints)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/**
    Client for the cloud licensing service.

    Holds only immutable state, so one instance can serve any number of
    concurrent calls. Each call is a single POST; nothing is cached or
    retried.

    Typical usage:
    ```ignore
    let config = ProxyConfig::from_hex(KEY_HEX, IV_HEX, "widevine_test")?;
    let proxy = Proxy::new(config, Arc::new(MyGovernor))?;

    let license = proxy.get_license("my-title", &challenge).await?;
    if license.status == "OK" {
        // hand license.license back to the CDM
    }
    ```
*/
pub struct Proxy {
    signer: Signer,
    provider: String,
    endpoints: Endpoints,
    governor: Arc<dyn KeyGovernor>,
    http: reqwest::Client,
}

impl Proxy {
    /**
        Validate the key material and build the HTTP client.

        Fails with [`ProxyError::Crypto`] if the signer rejects the key or IV.
    */
    pub fn new(config: ProxyConfig, governor: Arc<dyn KeyGovernor>) -> ProxyResult<Self> {
        let signer = Signer::new(&config.root_key, &config.root_iv)?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            signer,
            provider: config.provider,
            endpoints: config.endpoints,
            governor,
            http,
        })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /**
        URL this proxy sends `purpose` requests to.
    */
    pub fn url(&self, purpose: Purpose) -> String {
        self.endpoints.resolve(&self.provider, purpose)
    }

    /**
        Build the signed envelope for a license request.

        The governor supplies the content key; the challenge is passed through
        opaquely.
    */
    pub fn build_license_envelope(
        &self,
        content_id: &str,
        challenge: &[u8],
    ) -> ProxyResult<SignedEnvelope> {
        debug!(content_id, "building license message");
        let message =
            LicenseMessage::new(content_id, challenge, &self.provider, self.governor.as_ref());
        let envelope = SignedEnvelope::seal(&message, &self.signer, &self.provider)
            .inspect_err(|e| error!(error = %e, "failed to sign license message"))?;
        debug!(request = %envelope.request, "license message");
        Ok(envelope)
    }

    /**
        Build the signed envelope for a content key request.
    */
    pub fn build_content_key_envelope(
        &self,
        policy: &ContentKeyPolicy,
    ) -> ProxyResult<SignedEnvelope> {
        debug!(content_id = %policy.content_id, policy = %policy.policy, "building policy message");
        let message = PolicyMessage::from(policy);
        let envelope = SignedEnvelope::seal(&message, &self.signer, &self.provider)
            .inspect_err(|e| error!(error = %e, "failed to sign policy message"))?;
        debug!(request = %envelope.request, "policy message");
        Ok(envelope)
    }

    /**
        Base64 CENC header for a content id under this proxy's provider.
    */
    pub fn build_header(&self, content_id: &str) -> String {
        build_header(&self.provider, content_id.as_bytes())
    }

    /**
        Request a license for `content_id`, carrying the CDM challenge.

        The body is decoded whatever the HTTP status; callers branch on
        `status` themselves.
    */
    pub async fn get_license(
        &self,
        content_id: &str,
        challenge: &[u8],
    ) -> ProxyResult<LicenseResponse> {
        let envelope = self.build_license_envelope(content_id, challenge)?;
        let body = self.post(Purpose::License, &envelope).await?;
        decode_license_response(&body)
            .inspect_err(|e| error!(error = %e, "license response decode failed"))
    }

    /**
        Request content keys for a title under `policy`.

        The envelope is built from `policy`; `content_id` feeds the CENC
        header, which is only logged.
    */
    pub async fn get_content_key(
        &self,
        content_id: &str,
        policy: &ContentKeyPolicy,
    ) -> ProxyResult<ContentKeyResponse> {
        if content_id != policy.content_id {
            warn!(
                content_id,
                policy_content_id = %policy.content_id,
                "content id differs from policy content id"
            );
        }

        let envelope = self.build_content_key_envelope(policy)?;
        let body = self.post(Purpose::ContentKey, &envelope).await?;
        let response = decode_content_key_response(&body)
            .inspect_err(|e| error!(error = %e, "content key response decode failed"))?;

        debug!(pssh = %self.build_header(content_id), "built CENC header");
        Ok(response)
    }

    async fn post(&self, purpose: Purpose, envelope: &SignedEnvelope) -> ProxyResult<Vec<u8>> {
        let url = self.url(purpose);
        let payload = envelope.to_json()?;

        debug!(%url, %purpose, bytes = payload.len(), "sending request");
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(
            %status,
            body = %String::from_utf8_lossy(&body),
            "received response"
        );
        Ok(body.to_vec())
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("provider", &self.provider)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

/**
    Decode a single-layer license response body.
*/
pub fn decode_license_response(body: &[u8]) -> ProxyResult<LicenseResponse> {
    serde_json::from_slice(body).map_err(|e| ProxyError::json(DecodeStage::LicenseResponse, e))
}

/**
    Decode a content key response body.

    Two stages, each failing distinctly:
      1. the transport body is a JSON object with a base64 `response` string
         (`Json { TransportBody }`, or `EmptyResponse` if the field is absent)
      2. the decoded payload is the actual response
         (`InvalidBase64 { InnerResponse }`, `Json { InnerResponse }`)
*/
pub fn decode_content_key_response(body: &[u8]) -> ProxyResult<ContentKeyResponse> {
    let transport: serde_json::Map<String, Value> = serde_json::from_slice(body)
        .map_err(|e| ProxyError::json(DecodeStage::TransportBody, e))?;

    let encoded = match transport.get("response") {
        None | Some(Value::Null) => return Err(ProxyError::EmptyResponse),
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(ProxyError::Json {
                stage: DecodeStage::TransportBody,
                message: format!("`response` is not a string: {other}"),
            });
        }
    };

    let inner = data_encoding::BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| ProxyError::InvalidBase64 {
            stage: DecodeStage::InnerResponse,
            message: e.to_string(),
        })?;

    serde_json::from_slice(&inner).map_err(|e| ProxyError::json(DecodeStage::InnerResponse, e))
}

#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::test_utils::{FixedKeyGovernor, TEST_IV, TEST_KEY};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn config(base: &str) -> ProxyConfig {
        ProxyConfig::new(TEST_KEY, TEST_IV, "widevine_test")
            .with_endpoints(Endpoints::custom(base, base, base))
    }

    fn proxy(base: &str) -> Proxy {
        Proxy::new(config(base), Arc::new(FixedKeyGovernor::new(vec![0x22; 16]))).unwrap()
    }

    fn policy() -> ContentKeyPolicy {
        ContentKeyPolicy {
            content_id: "testing".into(),
            tracks: vec!["SD".into(), "HD".into(), "AUDIO".into()],
            drm_types: vec!["WIDEVINE".into()],
            policy: "default".into(),
        }
    }

    fn wrap(inner: &Value) -> Value {
        json!({ "response": data_encoding::BASE64.encode(inner.to_string().as_bytes()) })
    }

    /// License endpoint that checks the envelope the way the service would.
    async fn license_service(
        Path(provider): Path<String>,
        Json(envelope): Json<SignedEnvelope>,
    ) -> Json<Value> {
        let signer = Signer::new(&TEST_KEY, &TEST_IV).unwrap();
        if !envelope.verify(&signer).unwrap() {
            return Json(json!({ "status": "SIGNATURE_FAILED" }));
        }
        let message: LicenseMessage = envelope.open().unwrap();
        Json(json!({
            "status": "OK",
            "license": "CAIS",
            "license_metadata": {
                "content_id": message.content_id,
                "license_type": "STREAMING",
                "request_type": "NEW"
            },
            "content_provider": provider,
            "message_type": message.payload,
        }))
    }

    /// Content key endpoint that echoes the requested tracks.
    async fn content_key_service(Json(envelope): Json<SignedEnvelope>) -> Json<Value> {
        let message: PolicyMessage = envelope.open().unwrap();
        let tracks: Vec<Value> = message
            .tracks
            .iter()
            .map(|t| json!({ "type": t.track_type, "key_id": "a2lk", "key": "a2V5", "pssh": [] }))
            .collect();
        let inner = json!({
            "status": "OK",
            "already_used": false,
            "drm": [{ "type": message.drm_types[0], "system_id": "edef8ba9" }],
            "tracks": tracks,
        });
        Json(wrap(&inner))
    }

    #[test]
    fn proxy_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Proxy>();
    }

    #[test]
    fn bad_key_material_fails_construction() {
        let governor = Arc::new(FixedKeyGovernor::new(Vec::new()));
        let err = Proxy::new(ProxyConfig::new(vec![0; 7], TEST_IV, "p"), governor.clone())
            .unwrap_err();
        assert!(matches!(err, ProxyError::Crypto(_)));

        let err = Proxy::new(ProxyConfig::new(TEST_KEY, vec![0; 4], "p"), governor).unwrap_err();
        assert!(matches!(err, ProxyError::Crypto(_)));
    }

    #[test]
    fn config_from_hex() {
        let config = ProxyConfig::from_hex(
            "1ae8ccd0e7985cc0b6203a55855a1034afc252980e970ca90e5202689f947ab9",
            " d58ce954203b7c9a9a9d467f59839249\n",
            "widevine_test",
        )
        .unwrap();
        assert_eq!(config.root_key, TEST_KEY);
        assert_eq!(config.root_iv, TEST_IV);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));

        let err = ProxyConfig::from_hex("zz", "00", "p").unwrap_err();
        assert!(matches!(err, ProxyError::InvalidHex(_)));
    }

    #[test]
    fn debug_output_hides_key_material() {
        let rendered = format!("{:?}", config("http://localhost"));
        assert!(!rendered.contains("root_key"));
        assert!(!rendered.contains("26, 232"));
    }

    #[test]
    fn url_follows_provider() {
        let proxy = proxy("http://mock");
        assert_eq!(
            proxy.url(Purpose::License),
            "http://mock/getlicense/widevine_test"
        );
        assert_eq!(
            Proxy::new(
                ProxyConfig::new(TEST_KEY, TEST_IV, "acme"),
                Arc::new(FixedKeyGovernor::new(Vec::new())),
            )
            .unwrap()
            .url(Purpose::ContentKey),
            "https://license.widevine.com/cenc/getcontentkey/widevine_test"
        );
    }

    #[test]
    fn license_envelope_is_signed_by_provider() {
        let proxy = proxy("http://mock");
        let envelope = proxy.build_license_envelope("testing", b"challenge").unwrap();
        assert_eq!(envelope.signer, "widevine_test");
        assert!(envelope.verify(proxy.signer()).unwrap());

        let message: LicenseMessage = envelope.open().unwrap();
        assert_eq!(message.content_id, "dGVzdGluZw==");
        assert_eq!(
            message.content_key_specs[0].key,
            data_encoding::BASE64.encode(&[0x22; 16])
        );
    }

    #[test]
    fn content_key_envelope_uses_policy_content_id() {
        let proxy = proxy("http://mock");
        let envelope = proxy.build_content_key_envelope(&policy()).unwrap();
        let message: PolicyMessage = envelope.open().unwrap();
        assert_eq!(message.content_id, "dGVzdGluZw==");
        assert_eq!(message.tracks.len(), 3);
        assert!(envelope.verify(proxy.signer()).unwrap());
    }

    #[tokio::test]
    async fn get_license_ok() {
        let base = spawn(Router::new().route("/getlicense/{provider}", post(license_service))).await;
        let resp = proxy(&base)
            .get_license("fkj3ljaSdfalkr3j", b"challenge")
            .await
            .unwrap();

        assert_eq!(resp.status, "OK");
        assert_eq!(resp.license, "CAIS");
        assert_eq!(resp.license_metadata.content_id, "ZmtqM2xqYVNkZmFsa3Izag==");
        assert_eq!(resp.content_provider, "widevine_test");
        assert_eq!(resp.message_type, "Y2hhbGxlbmdl");
    }

    #[tokio::test]
    async fn get_license_decodes_error_status_bodies() {
        let router = Router::new().route(
            "/getlicense/{provider}",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    r#"{"status":"INVALID_LICENSE_CHALLENGE","status_message":"bad"}"#,
                )
            }),
        );
        let base = spawn(router).await;
        let resp = proxy(&base).get_license("x", b"").await.unwrap();
        assert_eq!(resp.status, "INVALID_LICENSE_CHALLENGE");
        assert_eq!(resp.status_message, "bad");
    }

    #[tokio::test]
    async fn get_license_non_json_body() {
        let router = Router::new().route(
            "/getlicense/{provider}",
            post(|| async { "<html>gateway timeout</html>" }),
        );
        let base = spawn(router).await;
        let err = proxy(&base).get_license("x", b"").await.unwrap_err();
        assert_eq!(err.stage(), Some(DecodeStage::LicenseResponse));
        assert!(matches!(err, ProxyError::Json { .. }));
    }

    #[tokio::test]
    async fn get_content_key_ok() {
        let base = spawn(
            Router::new().route("/getcontentkey/{provider}", post(content_key_service)),
        )
        .await;
        let resp = proxy(&base)
            .get_content_key("testing", &policy())
            .await
            .unwrap();

        assert_eq!(resp.status, "OK");
        assert!(!resp.already_used);
        assert_eq!(resp.drm[0].drm_type, "WIDEVINE");
        let tracks: Vec<_> = resp.tracks.iter().map(|t| t.track_type.as_str()).collect();
        assert_eq!(tracks, ["SD", "HD", "AUDIO"]);
    }

    #[tokio::test]
    async fn get_content_key_missing_response_field() {
        let router = Router::new().route(
            "/getcontentkey/{provider}",
            post(|| async { Json(json!({ "status": "OK", "other": "x" })) }),
        );
        let base = spawn(router).await;
        let err = proxy(&base)
            .get_content_key("testing", &policy())
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::EmptyResponse));
        assert_eq!(err.stage(), None);
    }

    #[tokio::test]
    async fn get_content_key_bad_transport_body() {
        let router = Router::new().route(
            "/getcontentkey/{provider}",
            post(|| async { "not json" }),
        );
        let base = spawn(router).await;
        let err = proxy(&base)
            .get_content_key("testing", &policy())
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Some(DecodeStage::TransportBody));
    }

    #[tokio::test]
    async fn get_content_key_bad_inner_base64() {
        let router = Router::new().route(
            "/getcontentkey/{provider}",
            post(|| async { Json(json!({ "response": "%%%not-base64%%%" })) }),
        );
        let base = spawn(router).await;
        let err = proxy(&base)
            .get_content_key("testing", &policy())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProxyError::InvalidBase64 {
                stage: DecodeStage::InnerResponse,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn get_content_key_bad_inner_json() {
        let router = Router::new().route(
            "/getcontentkey/{provider}",
            post(|| async {
                Json(json!({ "response": data_encoding::BASE64.encode(b"{\"status\":") }))
            }),
        );
        let base = spawn(router).await;
        let err = proxy(&base)
            .get_content_key("testing", &policy())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProxyError::Json {
                stage: DecodeStage::InnerResponse,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn timeout_is_transport_error() {
        let router = Router::new().route(
            "/getlicense/{provider}",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let base = spawn(router).await;
        let proxy = Proxy::new(
            config(&base).with_timeout(Duration::from_millis(200)),
            Arc::new(FixedKeyGovernor::new(Vec::new())),
        )
        .unwrap();
        let err = proxy.get_license("x", b"").await.unwrap_err();
        assert!(matches!(err, ProxyError::Transport(_)));
    }

    #[tokio::test]
    async fn concurrent_calls_share_one_proxy() {
        let base = spawn(Router::new().route("/getlicense/{provider}", post(license_service))).await;
        let proxy = Arc::new(proxy(&base));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let proxy = Arc::clone(&proxy);
                tokio::spawn(async move {
                    let content_id = format!("title-{i}");
                    let resp = proxy.get_license(&content_id, b"c").await.unwrap();
                    (content_id, resp)
                })
            })
            .collect();

        for handle in handles {
            let (content_id, resp) = handle.await.unwrap();
            assert_eq!(resp.status, "OK");
            assert_eq!(
                resp.license_metadata.content_id,
                data_encoding::BASE64.encode(content_id.as_bytes())
            );
        }
    }

    #[test]
    fn decode_content_key_rejects_non_string_response() {
        let err = decode_content_key_response(br#"{"response": 42}"#).unwrap_err();
        assert_eq!(err.stage(), Some(DecodeStage::TransportBody));
    }

    #[test]
    fn decode_content_key_null_response_is_empty() {
        let err = decode_content_key_response(br#"{"response": null}"#).unwrap_err();
        assert!(matches!(err, ProxyError::EmptyResponse));
    }

    #[test]
    fn decode_content_key_ignores_other_transport_fields() {
        let body = wrap(&json!({ "status": "OK", "tracks": [] }));
        let mut object = body.as_object().unwrap().clone();
        object.insert("debug".into(), json!({ "trace": [1, 2] }));
        let bytes = serde_json::to_vec(&object).unwrap();
        let resp = decode_content_key_response(&bytes).unwrap();
        assert_eq!(resp.status, "OK");
    }

    #[tokio::test]
    #[ignore = "talks to the live UAT licensing service"]
    async fn live_uat_content_key() {
        let proxy = Proxy::new(
            ProxyConfig::new(TEST_KEY, TEST_IV, "widevine_test"),
            Arc::new(FixedKeyGovernor::new(Vec::new())),
        )
        .unwrap();
        let resp = proxy.get_content_key("testing", &policy()).await.unwrap();
        assert_eq!(resp.status, "OK");
    }
}
