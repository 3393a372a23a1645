//! Moderation decisions issued from the console.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::history::DecisionKind;
use crate::error::ConsoleError;

/// Reason templates offered when rejecting or returning a listing.
pub const REASON_TEMPLATES: [&str; 6] = [
    "Prohibited item",
    "Wrong category",
    "Incorrect description",
    "Photo problems",
    "Suspected fraud",
    "Other",
];

/// A decision the moderator wants to record against a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    /// Publish the listing.
    Approve,
    /// Refuse the listing.
    Reject {
        /// Why the listing is refused.
        reason: String,
        /// Details for the seller.
        #[serde(default)]
        comment: Option<String>,
    },
    /// Return the listing to the seller for edits.
    RequestChanges {
        /// What must change.
        reason: String,
        /// Details for the seller.
        #[serde(default)]
        comment: Option<String>,
    },
}

impl Decision {
    /// Builds a rejection.
    #[must_use]
    pub fn reject(reason: impl Into<String>, comment: Option<String>) -> Self {
        Self::Reject {
            reason: reason.into(),
            comment,
        }
    }

    /// Builds a request for changes.
    #[must_use]
    pub fn request_changes(reason: impl Into<String>, comment: Option<String>) -> Self {
        Self::RequestChanges {
            reason: reason.into(),
            comment,
        }
    }

    /// The history entry kind this decision produces.
    #[must_use]
    pub const fn kind(&self) -> DecisionKind {
        match self {
            Self::Approve => DecisionKind::Approved,
            Self::Reject { .. } => DecisionKind::Rejected,
            Self::RequestChanges { .. } => DecisionKind::RequestChanges,
        }
    }

    /// Checks the decision is complete and normalizes its text fields:
    /// surrounding whitespace is trimmed and a blank comment becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidRequest`] if a rejection or a request
    /// for changes has a blank reason.
    pub fn validated(self) -> Result<Self, ConsoleError> {
        let normalize = |reason: String, comment: Option<String>| {
            let reason = reason.trim().to_string();
            if reason.is_empty() {
                return Err(ConsoleError::InvalidRequest(
                    "a reason is required to reject or return a listing".to_string(),
                ));
            }
            let comment = comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty());
            Ok((reason, comment))
        };
        match self {
            Self::Approve => Ok(Self::Approve),
            Self::Reject { reason, comment } => {
                let (reason, comment) = normalize(reason, comment)?;
                Ok(Self::Reject { reason, comment })
            }
            Self::RequestChanges { reason, comment } => {
                let (reason, comment) = normalize(reason, comment)?;
                Ok(Self::RequestChanges { reason, comment })
            }
        }
    }
}
