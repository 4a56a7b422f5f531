//! Concierge - development server for the WBC Training site.
//!
//! Serves the static marketing pages from disk and proxies `/api/chat` to
//! the Generative Language API, injecting the Sarah persona and walking an
//! ordered model-fallback list when the first-choice model is unavailable.

pub mod config;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod routes;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

pub use crate::config::Config;
pub use crate::provider::{ChatBackend, GeminiClient};

/// Application state shared across all request handlers.
///
/// Built once at startup and read-only afterwards: no request mutates it,
/// so handlers share it through a plain `Arc` without locking.
pub struct AppState {
    pub config: Config,
    /// Upstream backend; `None` when no API key was resolved at startup.
    pub backend: Option<Arc<dyn ChatBackend>>,
    /// Ordered model candidates, most preferred first. Never empty.
    pub candidates: Vec<String>,
    pub start_time: Instant,
}

impl AppState {
    /// Create the application state from resolved configuration.
    pub fn new(config: Config) -> Result<Self> {
        let candidates = provider::candidate_models(&config.preferred_model);
        info!(candidates = ?candidates, "model candidate order");

        let backend: Option<Arc<dyn ChatBackend>> = match &config.api_key {
            Some(key) => {
                let http = reqwest::Client::builder()
                    .timeout(Duration::from_secs(config.request_timeout_secs))
                    .build()?;
                Some(Arc::new(GeminiClient::new(http, &config.upstream_url, key)))
            }
            None => {
                warn!("no GEMINI_API_KEY resolved; chat endpoint will answer as unconfigured");
                None
            }
        };

        Ok(Self {
            config,
            backend,
            candidates,
            start_time: Instant::now(),
        })
    }
}
