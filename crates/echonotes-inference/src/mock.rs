//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use echonotes_inference::mock::MockGenerationBackend;
//!
//! let backend = MockGenerationBackend::new()
//!     .with_fixed_response("Tasks")
//!     .with_response_for("key points", "- one\n- two");
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use echonotes_core::{Error, GenerationBackend, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    /// (keyword, response) pairs, first match wins.
    routed_responses: Vec<(String, String)>,
    default_response: String,
    mode: MockMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockMode {
    Respond,
    Fail,
    Panic,
}

/// A recorded generation call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            routed_responses: Vec::new(),
            default_response: "Mock response".to_string(),
            mode: MockMode::Respond,
        }
    }
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Backend whose every call fails like an unreachable model.
    pub fn failing() -> Self {
        let mut backend = Self::new();
        Arc::make_mut(&mut backend.config).mode = MockMode::Fail;
        backend
    }

    /// Backend whose every call panics.
    pub fn panicking() -> Self {
        let mut backend = Self::new();
        Arc::make_mut(&mut backend.config).mode = MockMode::Panic;
        backend
    }

    /// Set the response returned when no keyword matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Return `response` for prompts containing `keyword`.
    pub fn with_response_for(
        mut self,
        keyword: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .routed_responses
            .push((keyword.into(), response.into()));
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn log_call(&self, system: &str, prompt: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
        });
    }

    fn respond(&self, prompt: &str) -> Result<String> {
        match self.config.mode {
            MockMode::Fail => Err(Error::Inference("simulated model failure".to_string())),
            MockMode::Panic => panic!("simulated model panic"),
            MockMode::Respond => Ok(self
                .config
                .routed_responses
                .iter()
                .find(|(keyword, _)| prompt.contains(keyword.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| self.config.default_response.clone())),
        }
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.log_call(system, prompt);
        self.respond(prompt)
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.config.mode == MockMode::Respond)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_response() {
        let backend = MockGenerationBackend::new();
        assert_eq!(backend.generate("anything").await.unwrap(), "Mock response");
    }

    #[tokio::test]
    async fn test_keyword_routing() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("fallthrough")
            .with_response_for("category", "Work");

        assert_eq!(backend.generate("pick a category").await.unwrap(), "Work");
        assert_eq!(backend.generate("other").await.unwrap(), "fallthrough");
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = MockGenerationBackend::failing();
        assert!(backend.generate("x").await.is_err());
        assert!(!backend.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_call_log_shared_between_clones() {
        let backend = MockGenerationBackend::new();
        let clone = backend.clone();
        clone.generate_with_system("sys", "prompt").await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "sys");
        assert_eq!(calls[0].prompt, "prompt");
    }
}
