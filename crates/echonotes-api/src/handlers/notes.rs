//! Note HTTP handlers.
//!
//! CRUD over the note store plus the AI actions (AI-enhanced create,
//! summarize, categorize, key points). Request bodies are validated before
//! the store or the model is touched.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use echonotes_core::defaults::{KEY_POINTS_COUNT, SUMMARY_MAX_WORDS};
use echonotes_core::{Error, NewNote, Note, NoteUpdate};

use crate::{ApiError, AppState};

// =============================================================================
// REQUEST / RESPONSE TYPES
// =============================================================================

/// Request body for creating a note with AI enrichment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAiNoteRequest {
    pub title: String,
    pub content: String,
    /// Store the generated summary (default: true)
    #[serde(default = "default_true")]
    pub auto_summarize: bool,
    /// Store the suggested category (default: true)
    #[serde(default = "default_true")]
    pub auto_categorize: bool,
}

fn default_true() -> bool {
    true
}

/// A stored note plus key points that were generated but not persisted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnhancedNote {
    #[serde(flatten)]
    pub note: Note,
    pub key_points: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
    pub note: Note,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategorizeResponse {
    pub category: String,
    pub note: Note,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct KeyPointsResponse {
    pub key_points: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub id: i64,
}

// =============================================================================
// HELPERS
// =============================================================================

async fn fetch_note(state: &AppState, id: i64) -> Result<Note, ApiError> {
    state
        .notes
        .get(id)
        .await?
        .ok_or_else(|| Error::NoteNotFound(id).into())
}

/// Write a single-field update back and return the stored note.
async fn persist_update(state: &AppState, id: i64, update: NoteUpdate) -> Result<Note, ApiError> {
    state
        .notes
        .update(id, update)
        .await?
        .ok_or_else(|| Error::NoteNotFound(id).into())
}

// =============================================================================
// CRUD
// =============================================================================

/// Create a note.
#[utoipa::path(
    post,
    path = "/notes/",
    tag = "Notes",
    request_body = NewNote,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let Json(new_note) = payload?;
    new_note.validate()?;

    let note = state.notes.create(new_note).await?;
    info!(
        subsystem = "api",
        op = "create_note",
        note_id = note.id,
        "Note created"
    );
    Ok((StatusCode::CREATED, Json(note)))
}

/// Create a note with AI-generated summary, category and key points.
///
/// Enrichment always runs. The summary and category are stored only when
/// their flag is set; key points are returned but never stored.
#[utoipa::path(
    post,
    path = "/notes/ai",
    tag = "Notes",
    request_body = CreateAiNoteRequest,
    responses(
        (status = 201, description = "Note created", body = EnhancedNote),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_ai_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateAiNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EnhancedNote>), ApiError> {
    let Json(req) = payload?;
    NewNote::new(req.title.as_str(), req.content.as_str()).validate()?;

    let enrichment = state.enricher.enhance(&req.title, &req.content).await;

    let summary = if req.auto_summarize {
        enrichment.summary
    } else {
        String::new()
    };
    let category = req.auto_categorize.then_some(enrichment.category);

    let note = state
        .notes
        .create(
            NewNote::new(req.title, req.content)
                .with_summary(summary)
                .with_category(category),
        )
        .await?;
    info!(
        subsystem = "api",
        op = "create_ai_note",
        note_id = note.id,
        key_points = enrichment.key_points.len(),
        "AI note created"
    );

    Ok((
        StatusCode::CREATED,
        Json(EnhancedNote {
            note,
            key_points: enrichment.key_points,
        }),
    ))
}

/// List all notes.
#[utoipa::path(
    get,
    path = "/notes/",
    tag = "Notes",
    responses((status = 200, description = "All notes", body = [Note]))
)]
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.notes.list_all().await?))
}

/// Get a note by id.
#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 404, description = "Note not found")
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let Path(id) = id?;
    Ok(Json(fetch_note(&state, id).await?))
}

/// Partially update a note.
///
/// Omitted or empty fields are left unchanged. A supplied title or content
/// must pass the same checks as on creation.
#[utoipa::path(
    put,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    request_body = NoteUpdate,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 404, description = "Note not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NoteUpdate>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Path(id) = id?;
    let Json(update) = payload?;
    update.validate()?;

    let note = persist_update(&state, id, update).await?;
    info!(
        subsystem = "api",
        op = "update_note",
        note_id = id,
        "Note updated"
    );
    Ok(Json(note))
}

/// Delete a note.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note deleted", body = DeleteResponse),
        (status = 404, description = "Note not found")
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id?;
    state
        .notes
        .delete(id)
        .await?
        .ok_or(Error::NoteNotFound(id))?;

    info!(
        subsystem = "api",
        op = "delete_note",
        note_id = id,
        "Note deleted"
    );
    Ok(Json(DeleteResponse {
        message: "Note deleted successfully".to_string(),
        id,
    }))
}

// =============================================================================
// AI ACTIONS
// =============================================================================

/// Regenerate and store the summary of a note.
#[utoipa::path(
    post,
    path = "/notes/{id}/summarize",
    tag = "AI",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "New summary and updated note", body = SummarizeResponse),
        (status = 404, description = "Note not found")
    )
)]
pub async fn summarize_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let Path(id) = id?;
    let note = fetch_note(&state, id).await?;

    let summary = state
        .enricher
        .summarize(&note.content, SUMMARY_MAX_WORDS)
        .await;
    let note = persist_update(&state, id, NoteUpdate::summary(summary.as_str())).await?;

    Ok(Json(SummarizeResponse { summary, note }))
}

/// Suggest and store a category for a note.
#[utoipa::path(
    post,
    path = "/notes/{id}/categorize",
    tag = "AI",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "New category and updated note", body = CategorizeResponse),
        (status = 404, description = "Note not found")
    )
)]
pub async fn categorize_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CategorizeResponse>, ApiError> {
    let Path(id) = id?;
    let note = fetch_note(&state, id).await?;

    let category = state
        .enricher
        .suggest_category(&note.title, &note.content)
        .await;
    let note = persist_update(&state, id, NoteUpdate::category(category.as_str())).await?;

    Ok(Json(CategorizeResponse { category, note }))
}

/// Extract key points from a note. Nothing is stored.
#[utoipa::path(
    get,
    path = "/notes/{id}/key-points",
    tag = "AI",
    params(("id" = i64, Path, description = "Note id")),
    responses(
        (status = 200, description = "Key points", body = KeyPointsResponse),
        (status = 404, description = "Note not found")
    )
)]
pub async fn note_key_points(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<KeyPointsResponse>, ApiError> {
    let Path(id) = id?;
    let note = fetch_note(&state, id).await?;

    let key_points = state
        .enricher
        .extract_key_points(&note.content, KEY_POINTS_COUNT)
        .await;

    Ok(Json(KeyPointsResponse { key_points }))
}
