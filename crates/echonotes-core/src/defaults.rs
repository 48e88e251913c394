//! Centralized default constants for EchoNotes.
//!
//! Limits that are part of the note contract live here so the store, the
//! API validation and the enrichment post-processing agree on them.

// =============================================================================
// NOTE LIMITS
// =============================================================================

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 225;

/// Maximum category length in characters.
pub const CATEGORY_MAX_CHARS: usize = 100;

// =============================================================================
// ENRICHMENT
// =============================================================================

/// Default word budget requested for generated summaries.
pub const SUMMARY_MAX_WORDS: usize = 150;

/// Characters kept by the local summary fallback.
pub const SUMMARY_FALLBACK_CHARS: usize = 150;

/// Characters of note content sent to the model when suggesting a category.
pub const CATEGORY_CONTENT_CHARS: usize = 500;

/// Category returned when the model fails or answers with something unusable.
pub const FALLBACK_CATEGORY: &str = "General";

/// Categories offered to the model as suggestions.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "Personal", "Work", "Ideas", "Tasks", "Learning", "Health", "Finance", "Travel",
];

/// Default number of key points extracted.
pub const KEY_POINTS_COUNT: usize = 5;

/// Word budget per key point stated in the prompt.
pub const KEY_POINT_MAX_WORDS: usize = 20;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Gemini REST endpoint.
pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generation model.
pub const GEN_MODEL: &str = "gemini-2.5-flash";

/// Timeout for a single generation request (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SERVER
// =============================================================================

/// Default listen port.
pub const SERVER_PORT: u16 = 8000;

/// Default database URL for local development.
pub const DATABASE_URL: &str = "postgres://localhost/echonotes";

/// Origins allowed by CORS when `ALLOWED_ORIGINS` is not set.
pub const ALLOWED_ORIGINS: &str = "https://echo-notes-app.vercel.app,http://localhost:5173";

/// Maximum accepted JSON request body in bytes. Note content has no length
/// rule of its own, so this is the effective ceiling on a note.
pub const REQUEST_BODY_LIMIT: usize = 10 * 1024 * 1024;
