//! Decision handlers: approve, reject, request changes, bulk.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{BulkDecisionRequest, BulkDecisionResponse, ListingDetailDto, ReasonRequest};
use crate::app_state::AppState;
use crate::domain::{Decision, ListingId};
use crate::error::{ConsoleError, ErrorResponse};
use crate::service::RefreshOutcome;

async fn decide(
    state: &AppState,
    id: ListingId,
    decision: Decision,
) -> Result<Json<ListingDetailDto>, ConsoleError> {
    let listing = state.service.decide(id, decision).await?;
    Ok(Json(ListingDetailDto::from(&listing)))
}

/// `POST /listings/{id}/approve`: Approve a listing.
///
/// # Errors
///
/// Returns [`ConsoleError::ListingNotFound`] or the upstream error.
#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/approve",
    tag = "Decisions",
    summary = "Approve a listing",
    params(
        ("id" = u64, Path, description = "Listing id"),
    ),
    responses(
        (status = 200, description = "Updated listing", body = ListingDetailDto),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 502, description = "Moderation API refused the decision", body = ErrorResponse),
    )
)]
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Result<impl IntoResponse, ConsoleError> {
    decide(&state, id, Decision::Approve).await
}

/// `POST /listings/{id}/reject`: Reject a listing.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidRequest`] for a blank reason,
/// [`ConsoleError::ListingNotFound`] or the upstream error.
#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/reject",
    tag = "Decisions",
    summary = "Reject a listing",
    params(
        ("id" = u64, Path, description = "Listing id"),
    ),
    request_body = ReasonRequest,
    responses(
        (status = 200, description = "Updated listing", body = ListingDetailDto),
        (status = 400, description = "Missing reason", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 502, description = "Moderation API refused the decision", body = ErrorResponse),
    )
)]
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    Json(req): Json<ReasonRequest>,
) -> Result<impl IntoResponse, ConsoleError> {
    decide(&state, id, Decision::reject(req.reason, req.comment)).await
}

/// `POST /listings/{id}/request-changes`: Return a listing to the seller.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidRequest`] for a blank reason,
/// [`ConsoleError::ListingNotFound`] or the upstream error.
#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/request-changes",
    tag = "Decisions",
    summary = "Request changes to a listing",
    params(
        ("id" = u64, Path, description = "Listing id"),
    ),
    request_body = ReasonRequest,
    responses(
        (status = 200, description = "Updated listing", body = ListingDetailDto),
        (status = 400, description = "Missing reason", body = ErrorResponse),
        (status = 404, description = "Listing not found", body = ErrorResponse),
        (status = 502, description = "Moderation API refused the decision", body = ErrorResponse),
    )
)]
pub async fn request_changes(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    Json(req): Json<ReasonRequest>,
) -> Result<impl IntoResponse, ConsoleError> {
    decide(&state, id, Decision::request_changes(req.reason, req.comment)).await
}

/// `POST /listings/bulk`: Apply one decision to several listings.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidRequest`] for an empty selection or a
/// missing reason, and [`ConsoleError::BulkDecisionFailed`] when some
/// submissions failed.
#[utoipa::path(
    post,
    path = "/api/v1/listings/bulk",
    tag = "Decisions",
    summary = "Bulk decision",
    description = "Submits the decision for every selected listing concurrently. Accepted decisions are kept even if others fail; the working copy is reloaded only when all succeed.",
    request_body = BulkDecisionRequest,
    responses(
        (status = 200, description = "Every decision accepted", body = BulkDecisionResponse),
        (status = 400, description = "Empty selection or missing reason", body = ErrorResponse),
        (status = 502, description = "Some decisions failed", body = ErrorResponse),
    )
)]
pub async fn bulk(
    State(state): State<AppState>,
    Json(req): Json<BulkDecisionRequest>,
) -> Result<impl IntoResponse, ConsoleError> {
    let decision = req.decision()?;
    let outcome = state.service.bulk_decide(req.ids, decision).await?;
    Ok(Json(BulkDecisionResponse {
        batch_id: outcome.batch_id,
        decided: outcome.decided,
        refreshed_listings: match outcome.refresh {
            Some(RefreshOutcome::Applied(count)) => Some(count),
            Some(RefreshOutcome::Discarded) | None => None,
        },
    }))
}

/// Decision routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/listings/bulk", post(bulk))
        .route("/listings/{id}/approve", post(approve))
        .route("/listings/{id}/reject", post(reject))
        .route("/listings/{id}/request-changes", post(request_changes))
}
