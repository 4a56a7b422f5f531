//! Direct client for the Generative Language API.

use async_trait::async_trait;
use tracing::debug;

use crate::provider::types::{
    reply_text, ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse,
};
use crate::provider::{ChatBackend, UpstreamError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
///
/// Holds the resolved credential and is shared read-only across requests.
/// The per-attempt timeout is carried by the underlying `reqwest::Client`.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, UpstreamError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(url = %url, "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) if !body.trim().is_empty() => body,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        reply_text(&parsed).ok_or(UpstreamError::EmptyReply)
    }
}
