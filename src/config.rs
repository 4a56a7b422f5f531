//! Configuration management.
//!
//! Every value resolves from the process environment first, then from the
//! first matching `KEY=value` line of a local configuration file, then a
//! default. A missing API key is a valid state: the server starts and the
//! chat endpoint answers as unconfigured.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::provider::gemini::DEFAULT_BASE_URL;

/// Model used when neither the environment nor the file names one.
pub const DEFAULT_MODEL: &str = "gemini-flash-lite-latest";

/// Application configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Directory the static site is served from
    pub static_root: String,

    /// Generative Language API base URL
    pub upstream_url: String,
    /// API credential; `None` leaves the chat endpoint unconfigured
    pub api_key: Option<String>,
    /// First-choice model for the candidate list
    pub preferred_model: String,
    /// Per-attempt timeout for upstream calls (in seconds)
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from the environment with `.env` as the file
    /// fallback.
    pub fn load() -> Result<Self> {
        Self::from_sources(Path::new(".env"))
    }

    /// Load configuration, consulting `env_file` for any key absent from
    /// the process environment.
    pub fn from_sources(env_file: &Path) -> Result<Self> {
        let lookup = |key: &str| resolve_var(key, env_file);

        Ok(Self {
            host: lookup("CONCIERGE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("CONCIERGE_PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("Invalid CONCIERGE_PORT")?,

            static_root: lookup("CONCIERGE_STATIC_ROOT").unwrap_or_else(|| "site".to_string()),

            upstream_url: lookup("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: lookup("GEMINI_API_KEY"),
            preferred_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout_secs: lookup("CONCIERGE_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .context("Invalid CONCIERGE_REQUEST_TIMEOUT_SECS")?,
        })
    }
}

/// Environment first, then the configuration file. Empty values count as
/// absent.
fn resolve_var(key: &str, env_file: &Path) -> Option<String> {
    if let Ok(value) = env::var(key) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }
    read_env_file(env_file, key)
}

/// Scan a `KEY=value` file for `key`.
///
/// Blank lines and `#` comments are skipped; surrounding single or double
/// quotes are trimmed from the value. The first match wins.
fn read_env_file(path: &Path, key: &str) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        if name.trim() != key {
            continue;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}
