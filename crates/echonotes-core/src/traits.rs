//! Core traits for EchoNotes abstractions.
//!
//! These traits define the interfaces that storage and inference backends
//! must implement, so the API layer can be wired against PostgreSQL and
//! Gemini in production and against in-process doubles in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewNote, Note, NoteUpdate};

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// Repository for note CRUD operations.
///
/// Lookups of unknown ids are not errors: they return `Ok(None)`.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note, returning it with its assigned id and timestamp.
    async fn create(&self, note: NewNote) -> Result<Note>;

    /// Fetch a note by id.
    async fn get(&self, id: i64) -> Result<Option<Note>>;

    /// All notes in insertion order.
    async fn list_all(&self) -> Result<Vec<Note>>;

    /// Apply a partial update. Omitted or empty fields are left unchanged.
    async fn update(&self, id: i64, update: NoteUpdate) -> Result<Option<Note>>;

    /// Remove a note, returning the deleted snapshot.
    async fn delete(&self, id: i64) -> Result<Option<Note>>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}
