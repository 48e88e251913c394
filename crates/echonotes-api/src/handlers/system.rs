//! Service info, health and OpenAPI handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{OpenApi, ToSchema};

use crate::{ApiDoc, ApiError, AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub docs: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses((status = 200, description = "Service info", body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to EchoNotes API".to_string(),
        docs: "/openapi.json".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check. Probes the note store; the remote model is not probed.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Note store unreachable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if let Err(e) = state.notes.ping().await {
        warn!(subsystem = "api", op = "health", error = %e, "Note store ping failed");
        return Err(ApiError::Unavailable("Note store is unavailable".to_string()));
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.enricher.model_name().to_string(),
    }))
}

/// OpenAPI document for this API.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
