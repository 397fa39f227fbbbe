//! Prediction backend abstractions and implementations.

pub mod backend;
pub mod mock;
pub mod ollama;
pub mod response;

pub use backend::{BackendError, PredictionBackend};
pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use response::extract_json_lenient;
