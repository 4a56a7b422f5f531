//! Upstream model selection and the ordered fallback loop.
//!
//! Model identifiers rotate and retire frequently upstream, and individual
//! models fail in soft ways (quota, deprecation, region locks). Instead of
//! pinning one name, the server builds an ordered candidate list at startup
//! and walks it on every request until a model answers.

pub mod gemini;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::provider::types::GenerateContentRequest;

pub use gemini::GeminiClient;

/// Known-good identifiers tried after the configured model, most
/// preferred first.
const FALLBACK_MODELS: &[&str] = &[
    "gemini-1.5-flash",
    "gemini-flash-latest",
    "gemini-pro-latest",
    "gemini-1.5-pro",
];

/// Failure of a single generation attempt against one model.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("upstream returned no usable reply")]
    EmptyReply,
}

/// Interface to the upstream generative service.
///
/// One attempt against one named model per call. Implementations are
/// shared read-only across requests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Issue a single generation call against `model`.
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, UpstreamError>;
}

/// Strip the `models/` prefix some configurations carry.
pub fn normalize_model(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}

/// Build the ordered, de-duplicated candidate list: the preferred model
/// first, then the fixed fallbacks. First occurrence wins.
pub fn candidate_models(preferred: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(1 + FALLBACK_MODELS.len());
    for name in std::iter::once(preferred).chain(FALLBACK_MODELS.iter().copied()) {
        let name = normalize_model(name.trim());
        if name.is_empty() || candidates.iter().any(|c| c == name) {
            continue;
        }
        candidates.push(name.to_string());
    }
    candidates
}

/// Walk the candidate list in order, one attempt each, stopping at the
/// first success. Per-attempt failures are logged; on exhaustion the last
/// failure is returned.
pub async fn generate_with_fallback(
    backend: &dyn ChatBackend,
    candidates: &[String],
    request: &GenerateContentRequest,
) -> Result<String, UpstreamError> {
    let mut last_error = UpstreamError::EmptyReply;
    for model in candidates {
        match backend.generate(model, request).await {
            Ok(reply) => {
                info!(backend = backend.name(), model = %model, "generation succeeded");
                return Ok(reply);
            }
            Err(err) => {
                warn!(backend = backend.name(), model = %model, error = %err, "generation attempt failed");
                last_error = err;
            }
        }
    }
    Err(last_error)
}
