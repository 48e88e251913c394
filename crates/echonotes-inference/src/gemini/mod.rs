//! Gemini inference backend.
//!
//! Talks to the Generative Language REST API (`models/{model}:generateContent`)
//! with the API key passed in the `x-goog-api-key` header.
//!
//! # Example
//!
//! ```rust,no_run
//! use echonotes_inference::gemini::{GeminiBackend, GeminiConfig};
//! use echonotes_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables
//!     let backend = GeminiBackend::from_env().unwrap();
//!
//!     // Or with custom config
//!     let config = GeminiConfig {
//!         api_key: Some("my-key".to_string()),
//!         model: "gemini-2.5-flash".to_string(),
//!         ..Default::default()
//!     };
//!     let backend = GeminiBackend::new(config).unwrap();
//!
//!     let text = backend.generate("Say hello").await.unwrap();
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    GeminiBackend, GeminiConfig, DEFAULT_GEMINI_URL, DEFAULT_GEN_MODEL, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_BACKOFF_MS, DEFAULT_TIMEOUT_SECS, MAX_RETRIES_CAP, MAX_RETRY_BACKOFF_MS,
};
pub use error::{to_echonotes_error, GeminiErrorCode};
pub use types::*;
