//! In-process note repository.
//!
//! Same contract as [`PgNoteRepository`](crate::PgNoteRepository) on top of a
//! `BTreeMap`, so ids come back in insertion order. Used by the API test
//! suite and for running the server without PostgreSQL.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use echonotes_core::{NewNote, Note, NoteRepository, NoteUpdate, Result};

/// Note repository held entirely in memory.
#[derive(Default)]
pub struct MemoryNoteRepository {
    notes: RwLock<BTreeMap<i64, Note>>,
    last_id: AtomicI64,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notes.
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn create(&self, note: NewNote) -> Result<Note> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = Note {
            id,
            title: note.title,
            content: note.content,
            summary: note.summary,
            category: note.category,
            created_at: Utc::now(),
        };
        self.notes.write().await.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<Note>> {
        Ok(self.notes.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        Ok(self.notes.read().await.values().cloned().collect())
    }

    async fn update(&self, id: i64, update: NoteUpdate) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        let Some(note) = notes.get_mut(&id) else {
            return Ok(None);
        };
        update.apply_to(note);
        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Note>> {
        Ok(self.notes.write().await.remove(&id))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
