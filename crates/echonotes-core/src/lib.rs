//! # echonotes-core
//!
//! Core types, traits, and abstractions for EchoNotes.
//!
//! This crate provides the note model, the error type and the trait
//! definitions that the storage, inference and API crates depend on.
//!
//! ## Log Level Contract
//!
//! All crates log through `tracing` with `subsystem`, `component` and `op`
//! fields.
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
