//! Ollama HTTP client for local model inference
//!
//! Talks to a local Ollama server over its HTTP API. The `/api/generate`
//! endpoint serves completions; `/api/tags` doubles as a health probe.
//!
//! # Example
//!
//! ```no_run
//! use skiff::ai::{OllamaBackend, PredictionBackend};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = OllamaBackend::with_timeout(
//!     "http://localhost:11434".to_string(),
//!     "llama3.1:8b".to_string(),
//!     Duration::from_secs(60),
//! );
//!
//! if backend.health_check().await? {
//!     let answer = backend.complete("Classify this project ...").await?;
//!     println!("{answer}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::ai::backend::{BackendError, PredictionBackend};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for a local Ollama server.
///
/// Thread-safe; share across tasks with `Arc`.
pub struct OllamaBackend {
    endpoint: String,
    model: String,
    http_client: Client,
    timeout: Duration,
}

impl OllamaBackend {
    pub fn new(endpoint: String, model: String) -> Self {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: String, model: String, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            endpoint,
            model,
            http_client,
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl PredictionBackend for OllamaBackend {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            format: "json",
            temperature: Some(0.3),
        };

        debug!(
            model = %self.model,
            prompt_length = prompt.len(),
            "Sending request to Ollama"
        );

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Ollama request timed out after {:?}", self.timeout);
                    BackendError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    warn!("Cannot connect to Ollama at {}", self.endpoint);
                    BackendError::Network {
                        message: format!("Connection failed: {}", e),
                    }
                } else {
                    BackendError::Network {
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, "Ollama API returned error: {}", body);

            if status == 404 && body.contains("model") {
                return Err(BackendError::Api {
                    status,
                    body: format!(
                        "Model '{}' not found. Pull it with: ollama pull {}",
                        self.model, self.model
                    ),
                });
            }
            return Err(BackendError::Api { status, body });
        }

        let generate: GenerateResponse = response.json().await.map_err(|e| {
            BackendError::InvalidResponse {
                message: format!("Malformed generate response: {}", e),
            }
        })?;

        debug!(response_length = generate.response.len(), "Ollama response received");
        Ok(generate.response)
    }

    fn name(&self) -> &str {
        "Ollama"
    }

    async fn health_check(&self) -> Result<bool, BackendError> {
        let url = format!("{}/api/tags", self.endpoint);

        debug!("Checking Ollama health at {}", url);

        match self.http_client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) if e.is_timeout() || e.is_connect() => {
                warn!("Ollama unreachable at {}", self.endpoint);
                Ok(false)
            }
            Err(e) => Err(BackendError::Network {
                message: format!("Health check failed: {}", e),
            }),
        }
    }
}
