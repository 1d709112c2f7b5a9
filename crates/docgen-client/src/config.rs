//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ApiError, Result};

/// Default REST collaborator base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to (e.g. `https://host/api`).
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Directory holding persisted state. `None` means `~/.docgen`.
    pub state_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with default settings.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("DOCGEN_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs: u64 = std::env::var("DOCGEN_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let state_dir = std::env::var("DOCGEN_STATE_DIR").ok().map(PathBuf::from);

        let config = Self {
            base_url: normalize_base_url(&base_url),
            timeout: Duration::from_secs(timeout_secs),
            state_dir,
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL, keeping other settings.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Check that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| ApiError::Configuration(format!("invalid base URL '{}': {}", self.base_url, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ApiError::Configuration(format!(
                "unsupported URL scheme '{}' in '{}'",
                other, self.base_url
            ))),
        }
    }

    /// Directory for persisted state, falling back to `~/.docgen`.
    pub fn resolve_state_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.state_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| ApiError::Configuration("Could not find home directory".to_string()))?;
        Ok(home.join(".docgen"))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            state_dir: None,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
