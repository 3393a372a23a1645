//! Console error types with HTTP status code mapping.
//!
//! [`ConsoleError`] is the central error type for the console backend. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response. The query pipeline itself never produces one.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ListingId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "listing not found: 42",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see the table on [`ConsoleError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Console error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status               |
/// |-----------|---------------------|---------------------------|
/// | 1000–1999 | Validation          | 400 Bad Request           |
/// | 2000–2999 | Not Found           | 404 Not Found             |
/// | 3000–3999 | Server              | 500 Internal Server Error |
/// | 5000–5999 | Upstream / Sequence | 502 Bad Gateway / 409     |
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Request body or path failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Query string could not be interpreted.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Listing with the given ID is unknown.
    #[error("listing not found: {0}")]
    ListingNotFound(ListingId),

    /// The moderation API answered with a non-success status.
    #[error("moderation api returned {status}: {message}")]
    Upstream {
        /// HTTP status returned by the moderation API.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The moderation API could not be reached or sent an unreadable body.
    #[error("moderation api unavailable: {0}")]
    UpstreamUnavailable(String),

    /// At least one submission of a bulk decision failed.
    #[error("{} of {} bulk decisions failed", .failed.len(), .failed.len() + .succeeded)]
    BulkDecisionFailed {
        /// Listings whose decision was not accepted.
        failed: Vec<ListingId>,
        /// Number of decisions that were accepted (and are not rolled back).
        succeeded: usize,
    },

    /// A newer request made this one obsolete; its result was discarded.
    #[error("request superseded by a newer one")]
    Superseded,

    /// Local state could not be read or written.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidQuery(_) => 1002,
            Self::ListingNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::Upstream { .. } => 5001,
            Self::UpstreamUnavailable(_) => 5002,
            Self::BulkDecisionFailed { .. } => 5003,
            Self::Superseded => 5004,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::ListingNotFound(_) => StatusCode::NOT_FOUND,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { .. }
            | Self::UpstreamUnavailable(_)
            | Self::BulkDecisionFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::Superseded => StatusCode::CONFLICT,
        }
    }

    /// Extra detail worth surfacing in the response body.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::BulkDecisionFailed { failed, .. } => Some(format!(
                "failed listings: {}",
                failed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
