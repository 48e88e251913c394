//! Core data models for EchoNotes.
//!
//! These types are shared across all EchoNotes crates and represent
//! the note entity plus the transient enrichment aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::{CATEGORY_MAX_CHARS, TITLE_MAX_CHARS};
use crate::error::{Error, Result};

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a note. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewNote {
    /// Note with empty summary and no category.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            summary: String::new(),
            category: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Check the title/content/category limits.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        Ok(())
    }
}

/// Partial update of a note.
///
/// `None` leaves a field unchanged. Empty strings are treated the same way
/// (see [`NoteUpdate::normalized`]), so a field cannot be cleared through an
/// update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NoteUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NoteUpdate {
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Default::default()
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Default::default()
        }
    }

    /// Drop every field that carries no change: omitted or empty.
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }
        Self {
            title: keep(self.title),
            content: keep(self.content),
            summary: keep(self.summary),
            category: keep(self.category),
        }
    }

    /// True when applying this update would not touch any column.
    pub fn is_noop(&self) -> bool {
        self.clone().normalized() == NoteUpdate::default()
    }

    /// Validate the supplied fields. Title and content, when present, follow
    /// the same rules as on creation.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        Ok(())
    }

    /// Apply the normalized update onto an in-memory note.
    pub fn apply_to(self, note: &mut Note) {
        let update = self.normalized();
        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(summary) = update.summary {
            note.summary = summary;
        }
        if let Some(category) = update.category {
            note.category = Some(category);
        }
    }
}

// =============================================================================
// ENRICHMENT TYPES
// =============================================================================

/// AI-derived view of a note. Never persisted as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EnrichmentResult {
    pub summary: String,
    pub category: String,
    pub key_points: Vec<String>,
}

// =============================================================================
// VALIDATION
// =============================================================================

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("title is required".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(Error::InvalidInput(format!(
            "title must be at most {} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::InvalidInput("content is required".to_string()));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if category.chars().count() > CATEGORY_MAX_CHARS {
        return Err(Error::InvalidInput(format!(
            "category must be at most {} characters",
            CATEGORY_MAX_CHARS
        )));
    }
    Ok(())
}
