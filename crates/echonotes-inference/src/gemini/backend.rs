//! Gemini inference backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use echonotes_core::{defaults, Error, GenerationBackend, Result};

use super::error::{to_echonotes_error, GeminiErrorCode};
use super::types::*;

/// Default Gemini API endpoint.
pub const DEFAULT_GEMINI_URL: &str = defaults::GEMINI_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::GEN_MODEL;

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = defaults::GEN_TIMEOUT_SECS;

/// Default number of retries for rate-limit and server errors.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default delay before the first retry, doubled on each attempt.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Upper bound on retries, whatever the configuration asks for.
pub const MAX_RETRIES_CAP: u32 = 5;

/// Upper bound on a single backoff sleep.
pub const MAX_RETRY_BACKOFF_MS: u64 = 8_000;

/// Configuration for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key. Without one every call fails with a configuration error.
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Retries for retryable failures (429, 5xx).
    pub max_retries: u32,
    /// Initial retry delay in milliseconds.
    pub retry_backoff_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_URL.to_string(),
            api_key: None,
            model: DEFAULT_GEN_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl GeminiConfig {
    /// Read `GEMINI_*` environment variables over the defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_URL.to_string()),
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string()),
            timeout_seconds: std::env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            max_retries: std::env::var("GEMINI_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .map(|n| n.min(MAX_RETRIES_CAP))
                .unwrap_or(DEFAULT_MAX_RETRIES),
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

/// Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "gemini",
            model = %config.model,
            url = %config.base_url,
            timeout_secs = config.timeout_seconds,
            has_api_key = config.api_key.is_some(),
            "Initializing Gemini backend"
        );
        if config.api_key.is_none() {
            warn!(
                subsystem = "inference",
                component = "gemini",
                "GEMINI_API_KEY is not set, enrichment will use local fallbacks"
            );
        }

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is not set".to_string()))
    }

    /// One `generateContent` round trip, without retries.
    async fn generate_once(
        &self,
        request: &GenerateContentRequest,
    ) -> std::result::Result<String, CallFailure> {
        let response = self
            .client
            .post(format!("{}:generateContent", self.model_url()))
            .header("x-goog-api-key", self.api_key()?)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: GeminiErrorResponse =
                response.json().await.unwrap_or(GeminiErrorResponse {
                    error: GeminiError {
                        code: status.as_u16(),
                        message: "Unknown error".to_string(),
                        status: String::new(),
                    },
                });
            let code = GeminiErrorCode::from_response(status.as_u16(), &body.error.status);
            return Err(CallFailure {
                retryable: code.is_retryable(),
                error: to_echonotes_error(
                    code,
                    &format!("Gemini returned {}: {}", status, body.error.message),
                ),
            });
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        result.text().ok_or_else(|| {
            Error::Inference(format!("Model returned no text: {}", result.empty_reason())).into()
        })
    }

    /// Retries actually attempted, capped at [`MAX_RETRIES_CAP`].
    fn retry_limit(&self) -> u32 {
        self.config.max_retries.min(MAX_RETRIES_CAP)
    }

    /// Sleep before retry number `attempt + 1`, capped at
    /// [`MAX_RETRY_BACKOFF_MS`].
    fn retry_delay(&self, attempt: u32) -> Duration {
        let ms = self
            .config
            .retry_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(MAX_RETRY_BACKOFF_MS);
        Duration::from_millis(ms)
    }

    /// Send a request, retrying rate-limit and server errors with
    /// exponential backoff.
    async fn generate_request(&self, request: GenerateContentRequest) -> Result<String> {
        let start = Instant::now();
        let max_retries = self.retry_limit();
        let mut attempt = 0;
        loop {
            match self.generate_once(&request).await {
                Ok(text) => {
                    debug!(
                        subsystem = "inference",
                        component = "gemini",
                        op = "generate",
                        model = %self.config.model,
                        attempts = attempt + 1,
                        response_len = text.len(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Generation complete"
                    );
                    return Ok(text);
                }
                Err(failure) if failure.retryable && attempt < max_retries => {
                    let delay = self.retry_delay(attempt);
                    warn!(
                        subsystem = "inference",
                        component = "gemini",
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure.error,
                        "Retryable Gemini error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}

/// A failed call together with whether it is worth repeating.
struct CallFailure {
    error: Error,
    retryable: bool,
}

impl From<Error> for CallFailure {
    fn from(error: Error) -> Self {
        Self {
            error,
            retryable: false,
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Generating"
        );

        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: (!system.is_empty()).then(|| Content::system(system)),
        };

        self.generate_request(request).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.model_url())
            .header("x-goog-api-key", self.api_key()?)
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!(
                    subsystem = "inference",
                    component = "gemini",
                    op = "health_check",
                    model = %self.config.model,
                    "Gemini health check passed"
                );
                Ok(true)
            }
            Ok(resp) => {
                warn!(
                    subsystem = "inference",
                    component = "gemini",
                    op = "health_check",
                    status = resp.status().as_u16(),
                    "Gemini health check failed"
                );
                Ok(false)
            }
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "gemini",
                    op = "health_check",
                    error = %e,
                    "Gemini health check error"
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_model_url_trims_trailing_slash() {
        let backend = GeminiBackend::new(GeminiConfig {
            base_url: "http://localhost:9999/v1beta/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            backend.model_url(),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash"
        );
    }

    #[test]
    fn test_retry_delay_doubles_and_is_capped() {
        let backend = GeminiBackend::new(GeminiConfig {
            retry_backoff_ms: 500,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.retry_delay(0), Duration::from_millis(500));
        assert_eq!(backend.retry_delay(2), Duration::from_millis(2_000));
        assert_eq!(
            backend.retry_delay(10),
            Duration::from_millis(MAX_RETRY_BACKOFF_MS)
        );
        assert_eq!(
            backend.retry_delay(200),
            Duration::from_millis(MAX_RETRY_BACKOFF_MS)
        );
    }

    #[test]
    fn test_retry_limit_is_capped() {
        let backend = GeminiBackend::new(GeminiConfig {
            max_retries: 70,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.retry_limit(), MAX_RETRIES_CAP);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_fast() {
        let backend = GeminiBackend::new(GeminiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        })
        .unwrap();

        let err = backend.generate("hello").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
