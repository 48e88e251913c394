//! Note repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use echonotes_core::{Error, NewNote, Note, NoteRepository, NoteUpdate, Result};

const NOTE_COLUMNS: &str = "id, title, content, summary, category, created_at";

/// PostgreSQL implementation of NoteRepository.
///
/// Every call checks a connection out of the pool for the duration of a
/// single statement; statements auto-commit.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a database row to a Note.
fn map_row_to_note(row: &sqlx::postgres::PgRow) -> Note {
    let created_at: DateTime<Utc> = row.get("created_at");
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        summary: row.get("summary"),
        category: row.get("category"),
        created_at,
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn create(&self, note: NewNote) -> Result<Note> {
        let row = sqlx::query(&format!(
            "INSERT INTO note (title, content, summary, category, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.summary)
        .bind(&note.category)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let created = map_row_to_note(&row);
        debug!(
            subsystem = "database",
            component = "notes",
            op = "create",
            note_id = created.id,
            "Note inserted"
        );
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<Note>> {
        let row = sqlx::query(&format!("SELECT {NOTE_COLUMNS} FROM note WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(map_row_to_note))
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!("SELECT {NOTE_COLUMNS} FROM note ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(map_row_to_note).collect())
    }

    async fn update(&self, id: i64, update: NoteUpdate) -> Result<Option<Note>> {
        let update = update.normalized();
        if update.is_noop() {
            return self.get(id).await;
        }

        let row = sqlx::query(&format!(
            "UPDATE note SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                summary = COALESCE($4, summary),
                category = COALESCE($5, category)
             WHERE id = $1
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.summary)
        .bind(&update.category)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "update",
            note_id = id,
            found = row.is_some(),
            "Note update applied"
        );
        Ok(row.as_ref().map(map_row_to_note))
    }

    async fn delete(&self, id: i64) -> Result<Option<Note>> {
        let row = sqlx::query(&format!(
            "DELETE FROM note WHERE id = $1 RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "delete",
            note_id = id,
            found = row.is_some(),
            "Note delete applied"
        );
        Ok(row.as_ref().map(map_row_to_note))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
