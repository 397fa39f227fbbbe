//! Prediction backend abstraction
//!
//! The classifier and the platform advisor both consult an optional
//! text-generation backend. The backend is a pure collaborator: it receives
//! a free-text instruction and returns free text. Any failure here is
//! swallowed by the caller and answered with the deterministic fallback;
//! a backend error must never abort an orchestration run.

use async_trait::async_trait;
use thiserror::Error;

/// Errors a prediction backend can report.
///
/// Callers treat every variant identically ("the backend did not produce a
/// usable answer"); the distinction exists for logging and for the `health`
/// subcommand.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Backend returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response from backend: {message}")]
    InvalidResponse { message: String },

    #[error("Backend not configured: {message}")]
    NotConfigured { message: String },
}

/// A text-generation service that answers one instruction with one
/// free-text response.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Sends `prompt` and returns the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;

    /// Human-readable backend name for logs and health output.
    fn name(&self) -> &str;

    /// Lightweight reachability probe.
    async fn health_check(&self) -> Result<bool, BackendError>;
}
