//! # echonotes-inference
//!
//! Text generation for EchoNotes.
//!
//! This crate provides:
//! - [`GeminiBackend`], a [`GenerationBackend`] over the Gemini REST API
//! - [`NoteEnricher`], which turns model output into summaries, categories
//!   and key points and falls back to local values when the model fails
//! - `MockGenerationBackend` (feature `mock`) for tests in dependent crates
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use echonotes_inference::{GeminiBackend, NoteEnricher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = GeminiBackend::from_env().unwrap();
//!     let enricher = NoteEnricher::new(Arc::new(backend));
//!     let result = enricher.enhance("Groceries", "Buy milk and eggs").await;
//!     println!("{} / {}", result.category, result.summary);
//! }
//! ```

pub mod enrichment;
pub mod gemini;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use echonotes_core::*;

pub use enrichment::NoteEnricher;
pub use gemini::{GeminiBackend, GeminiConfig};
