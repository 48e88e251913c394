//! # echonotes-api
//!
//! HTTP surface of EchoNotes: note CRUD plus AI enrichment endpoints.
//!
//! [`router`] assembles the routes and middleware over an [`AppState`];
//! the `echonotes-api` binary wires it to PostgreSQL and Gemini.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use uuid::Uuid;

use echonotes_core::defaults::REQUEST_BODY_LIMIT;

pub use config::{parse_allowed_origins, ServerConfig};
pub use error::ApiError;
pub use state::AppState;

use handlers::{notes, system};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EchoNotes API",
        description = "Note-taking API with AI-powered summaries, categories and key points"
    ),
    paths(
        system::root,
        system::health_check,
        notes::create_note,
        notes::create_ai_note,
        notes::list_notes,
        notes::get_note,
        notes::update_note,
        notes::delete_note,
        notes::summarize_note,
        notes::categorize_note,
        notes::note_key_points,
    ),
    components(schemas(
        echonotes_core::Note,
        echonotes_core::NewNote,
        echonotes_core::NoteUpdate,
        echonotes_core::EnrichmentResult,
        notes::CreateAiNoteRequest,
        notes::EnhancedNote,
        notes::SummarizeResponse,
        notes::CategorizeResponse,
        notes::KeyPointsResponse,
        notes::DeleteResponse,
        system::RootResponse,
        system::HealthResponse,
    )),
    tags(
        (name = "Notes", description = "Note CRUD operations"),
        (name = "AI", description = "AI enrichment of stored notes"),
        (name = "System", description = "Health checks and service info")
    )
)]
pub struct ApiDoc;

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router with CORS restricted to `allowed_origins`.
pub fn router(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health_check))
        .route("/openapi.json", get(system::openapi_json))
        .route("/notes/", post(notes::create_note).get(notes::list_notes))
        .route("/notes", post(notes::create_note).get(notes::list_notes))
        .route("/notes/ai", post(notes::create_ai_note))
        .route(
            "/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/notes/:id/summarize", post(notes::summarize_note))
        .route("/notes/:id/categorize", post(notes::categorize_note))
        .route("/notes/:id/key-points", get(notes::note_key_points))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(state)
}
