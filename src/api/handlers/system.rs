//! System endpoints: health check, reason templates, query defaults.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::QueryParameters;
use crate::domain::decision::REASON_TEMPLATES;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /config/reasons`: Reason templates for rejections and change
/// requests.
#[utoipa::path(
    get,
    path = "/api/v1/config/reasons",
    tag = "System",
    summary = "List reason templates",
    responses(
        (status = 200, description = "Reason templates", body = Vec<String>),
    )
)]
pub async fn reasons_handler() -> impl IntoResponse {
    Json(REASON_TEMPLATES)
}

/// `GET /query/defaults`: The reset state of the listing filters.
#[utoipa::path(
    get,
    path = "/api/v1/query/defaults",
    tag = "System",
    summary = "Default query parameters",
    responses(
        (status = 200, description = "Reset state", body = QueryParameters),
    )
)]
pub async fn query_defaults_handler() -> impl IntoResponse {
    Json(QueryParameters::default())
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

/// Configuration routes mounted under /api/v1.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/config/reasons", get(reasons_handler))
        .route("/query/defaults", get(query_defaults_handler))
}
