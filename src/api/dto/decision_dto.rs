//! Decision DTOs for the single and bulk decision endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Decision, ListingId};
use crate::error::ConsoleError;

/// Body of `POST /listings/{id}/reject` and `/request-changes`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReasonRequest {
    /// Reason, usually one of `GET /config/reasons`.
    pub reason: String,
    /// Free-form details for the seller.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Action applied by a bulk decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    /// Approve every selected listing.
    Approve,
    /// Reject every selected listing.
    Reject,
    /// Return every selected listing for changes.
    #[serde(alias = "request-changes")]
    RequestChanges,
}

/// Body of `POST /listings/bulk`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkDecisionRequest {
    /// Selected listings; duplicates are ignored.
    pub ids: Vec<ListingId>,
    /// Decision to apply.
    pub action: BulkAction,
    /// Required for `reject` and `request_changes`.
    #[serde(default)]
    pub reason: Option<String>,
    /// Optional details for the sellers.
    #[serde(default)]
    pub comment: Option<String>,
}

impl BulkDecisionRequest {
    /// The decision to apply to every selected listing.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidRequest`] if a rejection or a request
    /// for changes carries no reason.
    pub fn decision(&self) -> Result<Decision, ConsoleError> {
        let reason = || {
            self.reason.clone().ok_or_else(|| {
                ConsoleError::InvalidRequest(format!("{:?} requires a reason", self.action))
            })
        };
        Ok(match self.action {
            BulkAction::Approve => Decision::Approve,
            BulkAction::Reject => Decision::reject(reason()?, self.comment.clone()),
            BulkAction::RequestChanges => {
                Decision::request_changes(reason()?, self.comment.clone())
            }
        })
    }
}

/// Response body for a fully successful `POST /listings/bulk`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkDecisionResponse {
    /// Correlation id of the batch in the server logs.
    pub batch_id: Uuid,
    /// Number of listings decided.
    pub decided: usize,
    /// Listings in the working copy after the follow-up refresh, if it
    /// was applied.
    pub refreshed_listings: Option<usize>,
}
