//! Shared handler state.

use std::sync::Arc;

use echonotes_core::NoteRepository;
use echonotes_inference::NoteEnricher;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Note store: PostgreSQL in production, in-memory in tests.
    pub notes: Arc<dyn NoteRepository>,
    pub enricher: Arc<NoteEnricher>,
}

impl AppState {
    pub fn new(notes: Arc<dyn NoteRepository>, enricher: NoteEnricher) -> Self {
        Self {
            notes,
            enricher: Arc::new(enricher),
        }
    }
}
