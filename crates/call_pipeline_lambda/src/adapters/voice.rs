//! Vonage Voice API client used to place outbound calls.

use std::fmt;
use std::time::Duration;

use call_pipeline_core::ncco::{CreateCallRequest, CreateCallResponse};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::block_on;

pub const DEFAULT_API_BASE_URL: &str = "https://api.nexmo.com";
const CALLS_PATH: &str = "/v1/calls";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const TOKEN_TTL_SECONDS: i64 = 900;

pub trait VoiceCaller {
    fn place_call(&self, request: &CreateCallRequest) -> Result<CreateCallResponse, String>;
}

#[derive(Debug, Error)]
pub enum VoiceApiError {
    #[error("failed to sign Vonage JWT: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("Vonage request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Vonage returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Vonage response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Clone, PartialEq, Eq)]
pub struct VonageCredentials {
    pub application_id: String,
    pub private_key_pem: String,
}

impl fmt::Debug for VonageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VonageCredentials")
            .field("application_id", &self.application_id)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VonageClaims {
    pub application_id: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl VonageCredentials {
    /// Signs a short-lived application JWT. A fresh token is minted per call,
    /// so a bad key surfaces as a failure of that call only.
    pub fn mint_token(&self) -> Result<String, VoiceApiError> {
        let key = EncodingKey::from_rsa_pem(self.private_key_pem.as_bytes())?;
        let issued_at = chrono::Utc::now().timestamp();
        let claims = VonageClaims {
            application_id: self.application_id.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECONDS,
            jti: uuid::Uuid::new_v4().to_string(),
        };
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }
}

#[derive(Debug, Clone)]
pub struct VonageVoiceClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: VonageCredentials,
}

impl VonageVoiceClient {
    pub fn new(base_url: &str, credentials: VonageCredentials) -> Result<Self, VoiceApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(VoiceApiError::Http)?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub async fn create_call(
        &self,
        body: &CreateCallRequest,
    ) -> Result<CreateCallResponse, VoiceApiError> {
        let token = self.credentials.mint_token()?;
        let response = self
            .http_client
            .post(format!("{}{CALLS_PATH}", self.base_url))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(VoiceApiError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<CreateCallResponse>()
            .await
            .map_err(VoiceApiError::Decode)
    }
}

impl VoiceCaller for VonageVoiceClient {
    fn place_call(&self, request: &CreateCallRequest) -> Result<CreateCallResponse, String> {
        block_on(self.create_call(request)).map_err(|error| error.to_string())
    }
}
