//! Type-safe listing identifier.
//!
//! [`ListingId`] is a newtype wrapper around the numeric identifier the
//! moderation API assigns to every advertisement, so that listing ids
//! cannot be confused with moderator or seller ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a listing under moderation.
///
/// Assigned by the advertisement-submission system and immutable for the
/// lifetime of the listing. Used as the key in [`super::ListingStore`] and
/// as the final tie-break of every sort order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ListingId(u64);

impl ListingId {
    /// Creates a `ListingId` from a raw numeric identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for ListingId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ListingId> for u64 {
    fn from(id: ListingId) -> Self {
        id.0
    }
}
