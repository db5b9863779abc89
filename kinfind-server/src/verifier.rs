//! Face verification backends
//!
//! Deciding whether two photos show the same person is delegated to an
//! external service. [`DeepFaceClient`] talks to a DeepFace-compatible HTTP
//! API (`POST /verify`), sending both images inline as base64 data URIs.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use kinfind_common::config::VerifierConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("kinfind/", env!("CARGO_PKG_VERSION"));

/// Verification backend errors
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Outcome of comparing two face images
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Verification {
    /// Whether both images depict the same person
    pub verified: bool,
    /// Embedding distance reported by the backend, if any
    #[serde(default)]
    pub distance: Option<f64>,
    /// Distance threshold the backend applied, if any
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Pairwise face verification
#[async_trait]
pub trait FaceVerifier: Send + Sync {
    /// Short backend description for logs and /health
    fn name(&self) -> &str;

    /// Compare a probe photo against one candidate photo
    async fn verify(&self, probe: &[u8], candidate: &[u8]) -> Result<Verification, VerifierError>;
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    img1: String,
    img2: String,
    model_name: &'a str,
    detector_backend: &'a str,
    enforce_detection: bool,
}

/// Client for a DeepFace-compatible verification API
pub struct DeepFaceClient {
    http_client: reqwest::Client,
    endpoint: String,
    model_name: String,
    detector_backend: String,
    enforce_detection: bool,
    description: String,
}

impl DeepFaceClient {
    pub fn new(config: &VerifierConfig) -> Result<Self, VerifierError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VerifierError::Network(e.to_string()))?;

        let endpoint = format!("{}/verify", config.url.trim_end_matches('/'));

        Ok(Self {
            http_client,
            description: format!("deepface {} ({})", config.model_name, endpoint),
            endpoint,
            model_name: config.model_name.clone(),
            detector_backend: config.detector_backend.clone(),
            enforce_detection: config.enforce_detection,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FaceVerifier for DeepFaceClient {
    fn name(&self) -> &str {
        &self.description
    }

    async fn verify(&self, probe: &[u8], candidate: &[u8]) -> Result<Verification, VerifierError> {
        let request = VerifyRequest {
            img1: data_uri(probe),
            img2: data_uri(candidate),
            model_name: &self.model_name,
            detector_backend: &self.detector_backend,
            enforce_detection: self.enforce_detection,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| VerifierError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VerifierError::Api(status.as_u16(), error_text));
        }

        let verification: Verification = response
            .json()
            .await
            .map_err(|e| VerifierError::Parse(e.to_string()))?;

        tracing::debug!(
            verified = verification.verified,
            distance = ?verification.distance,
            threshold = ?verification.threshold,
            "Face verification completed"
        );

        Ok(verification)
    }
}

/// Encode image bytes as a `data:` URI
pub fn data_uri(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("image/jpeg");
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}
