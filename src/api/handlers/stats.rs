//! Statistics and moderator profile handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::app_state::AppState;
use crate::domain::listing::UnknownVariant;
use crate::domain::{Moderator, StatsOverview, StatsPeriod};
use crate::error::{ConsoleError, ErrorResponse};

/// Query string of `GET /stats`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// `today`, `week` (default) or `month`.
    pub period: Option<String>,
}

/// `GET /stats`: Moderation statistics for a period.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidQuery`] for an unknown period, or the
/// upstream error.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "Statistics",
    summary = "Get statistics",
    description = "Summary, daily activity and category distribution for the period, fetched concurrently from the moderation API.",
    params(StatsQuery),
    responses(
        (status = 200, description = "Statistics overview", body = StatsOverview),
        (status = 400, description = "Unknown period", body = ErrorResponse),
        (status = 502, description = "Moderation API failed", body = ErrorResponse),
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, ConsoleError> {
    let period = match query.period.as_deref().map(str::trim) {
        None | Some("") => StatsPeriod::default(),
        Some(raw) => raw
            .parse()
            .map_err(|e: UnknownVariant| ConsoleError::InvalidQuery(e.to_string()))?,
    };
    Ok(Json(state.service.stats(period).await?))
}

/// `GET /moderators/me`: The moderator the console acts as.
///
/// # Errors
///
/// Returns the upstream error.
#[utoipa::path(
    get,
    path = "/api/v1/moderators/me",
    tag = "Statistics",
    summary = "Current moderator",
    responses(
        (status = 200, description = "Moderator profile", body = Moderator),
        (status = 502, description = "Moderation API failed", body = ErrorResponse),
    )
)]
pub async fn current_moderator(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ConsoleError> {
    Ok(Json(state.service.current_moderator().await?))
}

/// Statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/moderators/me", get(current_moderator))
}
