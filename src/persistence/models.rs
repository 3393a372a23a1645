//! On-disk document shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Listing;

/// Contents of `listings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredWorkingCopy {
    /// When the working copy was written.
    pub saved_at: DateTime<Utc>,
    /// Every listing in the working copy, ordered by id.
    pub listings: Vec<Listing>,
}
