//! Theme preference handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::ThemeDto;
use crate::app_state::AppState;
use crate::error::{ConsoleError, ErrorResponse};

/// `GET /preferences/theme`: Current theme.
#[utoipa::path(
    get,
    path = "/api/v1/preferences/theme",
    tag = "Preferences",
    summary = "Get theme",
    responses(
        (status = 200, description = "Current theme", body = ThemeDto),
    )
)]
pub async fn get_theme(State(state): State<AppState>) -> impl IntoResponse {
    Json(ThemeDto {
        theme: state.service.theme().await,
    })
}

/// `PUT /preferences/theme`: Set the theme.
///
/// # Errors
///
/// Returns [`ConsoleError::PersistenceError`] if the choice cannot be saved.
#[utoipa::path(
    put,
    path = "/api/v1/preferences/theme",
    tag = "Preferences",
    summary = "Set theme",
    request_body = ThemeDto,
    responses(
        (status = 200, description = "Theme saved", body = ThemeDto),
        (status = 500, description = "Preference could not be saved", body = ErrorResponse),
    )
)]
pub async fn put_theme(
    State(state): State<AppState>,
    Json(req): Json<ThemeDto>,
) -> Result<impl IntoResponse, ConsoleError> {
    let theme = state.service.set_theme(req.theme).await?;
    Ok(Json(ThemeDto { theme }))
}

/// `POST /preferences/theme/toggle`: Switch between light and dark.
///
/// # Errors
///
/// Returns [`ConsoleError::PersistenceError`] if the choice cannot be saved.
#[utoipa::path(
    post,
    path = "/api/v1/preferences/theme/toggle",
    tag = "Preferences",
    summary = "Toggle theme",
    responses(
        (status = 200, description = "Theme saved", body = ThemeDto),
        (status = 500, description = "Preference could not be saved", body = ErrorResponse),
    )
)]
pub async fn toggle_theme(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ConsoleError> {
    let theme = state.service.toggle_theme().await?;
    Ok(Json(ThemeDto { theme }))
}

/// Preference routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/preferences/theme", get(get_theme).put(put_theme))
        .route("/preferences/theme/toggle", post(toggle_theme))
}
