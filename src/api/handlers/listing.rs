//! Listing handlers: query, refresh, details, neighbours.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ListingDetailDto, ListingListResponse, ListingQuery, RefreshResponse};
use crate::app_state::AppState;
use crate::domain::{ListingId, Neighbours};
use crate::error::{ConsoleError, ErrorResponse};
use crate::service::RefreshOutcome;

/// `GET /listings`: Query the working copy.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidQuery`] if the query string cannot be
/// interpreted.
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    tag = "Listings",
    summary = "Query listings",
    description = "Filters, searches, sorts and paginates the working copy. Out-of-range pages are clamped.",
    params(ListingQuery),
    responses(
        (status = 200, description = "One page of listings", body = ListingListResponse),
        (status = 400, description = "Malformed query string", body = ErrorResponse),
    )
)]
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse, ConsoleError> {
    let params = query.into_parameters()?;
    let page = state.service.query(&params).await;
    Ok(Json(ListingListResponse::from(&page)))
}

/// `POST /listings/refresh`: Reload the working copy from the moderation API.
///
/// # Errors
///
/// Returns [`ConsoleError::Superseded`] if a newer refresh started first,
/// or the upstream error.
#[utoipa::path(
    post,
    path = "/api/v1/listings/refresh",
    tag = "Listings",
    summary = "Refresh listings",
    description = "Fetches every listing from the moderation API and replaces the working copy. A newer refresh supersedes this one.",
    responses(
        (status = 200, description = "Working copy replaced", body = RefreshResponse),
        (status = 409, description = "Superseded by a newer refresh", body = ErrorResponse),
        (status = 502, description = "Moderation API failed", body = ErrorResponse),
    )
)]
pub async fn refresh_listings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ConsoleError> {
    match state.service.refresh_listings().await? {
        RefreshOutcome::Applied(listings) => Ok(Json(RefreshResponse { listings })),
        RefreshOutcome::Discarded => Err(ConsoleError::Superseded),
    }
}

/// `GET /listings/{id}`: Listing details with history.
///
/// # Errors
///
/// Returns [`ConsoleError::ListingNotFound`] if the listing is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    tag = "Listings",
    summary = "Get listing details",
    description = "Fetches the listing from the moderation API, falling back to the working copy when the API is unreachable.",
    params(
        ("id" = u64, Path, description = "Listing id"),
    ),
    responses(
        (status = 200, description = "Listing details", body = ListingDetailDto),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 502, description = "Moderation API failed", body = ErrorResponse),
    )
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Result<impl IntoResponse, ConsoleError> {
    let listing = state.service.listing(id).await?;
    Ok(Json(ListingDetailDto::from(&listing)))
}

/// `GET /listings/{id}/neighbours`: Previous and next listing under a query.
///
/// # Errors
///
/// Returns [`ConsoleError::ListingNotFound`] if the listing is not in the
/// working copy, or [`ConsoleError::InvalidQuery`].
#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}/neighbours",
    tag = "Listings",
    summary = "Get neighbouring listings",
    description = "Returns the ids shown immediately before and after the listing under the same query string, across page boundaries.",
    params(
        ("id" = u64, Path, description = "Listing id"),
        ListingQuery,
    ),
    responses(
        (status = 200, description = "Neighbouring ids", body = Neighbours),
        (status = 404, description = "Listing not in the working copy", body = ErrorResponse),
    )
)]
pub async fn get_neighbours(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse, ConsoleError> {
    let params = query.into_parameters()?;
    let neighbours = state.service.neighbours(id, &params).await?;
    Ok(Json(neighbours))
}

/// Listing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/listings", get(list_listings))
        .route("/listings/refresh", post(refresh_listings))
        .route("/listings/{id}", get(get_listing))
        .route("/listings/{id}/neighbours", get(get_neighbours))
}
