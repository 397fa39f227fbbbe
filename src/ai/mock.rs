//! Queued mock backend for tests.

use super::backend::{BackendError, PredictionBackend};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

enum MockAnswer {
    Text(String),
    Error(BackendError),
}

/// Scripted [`PredictionBackend`] returning queued answers in order.
///
/// An empty queue answers with an `InvalidResponse` error, which callers
/// treat as "backend unavailable".
pub struct MockBackend {
    answers: Mutex<VecDeque<MockAnswer>>,
    prompts: Mutex<Vec<String>>,
    healthy: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            healthy: true,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.answers
            .lock()
            .unwrap()
            .push_back(MockAnswer::Text(text.into()));
    }

    pub fn push_error(&self, error: BackendError) {
        self.answers
            .lock()
            .unwrap()
            .push_back(MockAnswer::Error(error));
    }

    /// Prompts received so far, for asserting on prompt contents.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionBackend for MockBackend {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.answers.lock().unwrap().pop_front() {
            Some(MockAnswer::Text(text)) => Ok(text),
            Some(MockAnswer::Error(error)) => Err(error),
            None => Err(BackendError::InvalidResponse {
                message: "MockBackend has no queued answers".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "Mock"
    }

    async fn health_check(&self) -> Result<bool, BackendError> {
        Ok(self.healthy)
    }
}
