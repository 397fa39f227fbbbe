//! Configuration management for skiff
//!
//! Settings load from environment variables with sensible defaults, after an
//! optional `.env` file in the working directory. The AI backend is strictly
//! optional: an unreachable Ollama daemon is not an error, it just means
//! every decision takes the deterministic path.
//!
//! # Environment Variables
//!
//! - `SKIFF_MODEL`: Ollama model name - default: "llama3.1:8b"
//! - `SKIFF_OLLAMA_ENDPOINT`: Ollama base URL - default: "http://localhost:11434"
//! - `SKIFF_REQUEST_TIMEOUT`: AI request timeout in seconds - default: "30"
//! - `SKIFF_LOG_LEVEL`: Logging level - default: "info"
//!
//! Platform credentials (`NETLIFY_AUTH_TOKEN`, `NETLIFY_SITE_ID`,
//! `VERCEL_TOKEN`) are read by the platform CLIs themselves; skiff only
//! loads `.env` so they are visible to spawned processes.

use crate::ai::{OllamaBackend, PredictionBackend};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const DEFAULT_MODEL: &str = "llama3.1:8b";
const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SkiffConfig {
    /// Ollama model used for classification and recommendation.
    pub model: String,

    /// Base URL of the Ollama daemon.
    pub ollama_endpoint: String,

    /// AI request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Disables the AI backend entirely, forcing deterministic paths.
    pub no_ai: bool,
}

impl Default for SkiffConfig {
    /// Loads from environment variables, falling back to defaults for any
    /// missing value. Call [`SkiffConfig::load_dotenv`] first if `.env`
    /// support is wanted.
    fn default() -> Self {
        let model = env::var("SKIFF_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let ollama_endpoint = env::var("SKIFF_OLLAMA_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_OLLAMA_ENDPOINT.to_string());

        let request_timeout_secs = env::var("SKIFF_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let log_level = env::var("SKIFF_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            model,
            ollama_endpoint,
            request_timeout_secs,
            log_level,
            no_ai: false,
        }
    }
}

impl SkiffConfig {
    /// Loads `.env` from the working directory, if present. Existing
    /// process environment always wins over file values.
    pub fn load_dotenv() {
        match dotenv::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env"),
            Err(_) => debug!("No .env file found"),
        }
    }

    /// Checks that numeric values are in range and the endpoint looks like
    /// a URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if !self.ollama_endpoint.starts_with("http://")
            && !self.ollama_endpoint.starts_with("https://")
        {
            return Err(ConfigError::ValidationFailed(format!(
                "Ollama endpoint must be an http(s) URL, got '{}'",
                self.ollama_endpoint
            )));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name cannot be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::ValidationFailed(format!(
                "Invalid log level '{}'. Valid levels: trace, debug, info, warn, error",
                other
            ))),
        }
    }

    /// Builds the AI backend when it is enabled and reachable.
    ///
    /// `None` means "work without AI": the backend was disabled, could not
    /// be constructed, or did not answer a health probe. Callers never see
    /// an error from here.
    pub async fn create_backend(&self) -> Option<Arc<dyn PredictionBackend>> {
        if self.no_ai {
            info!("AI assistance disabled, using deterministic analysis");
            return None;
        }

        let backend = OllamaBackend::with_timeout(
            self.ollama_endpoint.clone(),
            self.model.clone(),
            Duration::from_secs(self.request_timeout_secs),
        );

        match backend.health_check().await {
            Ok(true) => {
                info!(endpoint = %self.ollama_endpoint, model = %self.model, "AI backend ready");
                Some(Arc::new(backend))
            }
            Ok(false) => {
                warn!(
                    endpoint = %self.ollama_endpoint,
                    "Ollama not reachable, using deterministic analysis"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "AI backend health check failed, using deterministic analysis");
                None
            }
        }
    }
}
