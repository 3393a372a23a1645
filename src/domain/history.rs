//! Append-only moderation history.
//!
//! Every decision recorded against a listing becomes an immutable
//! [`ModerationHistoryEntry`]. [`ModerationHistory`] keeps entries ordered
//! by timestamp ascending no matter in which order they arrived, and
//! offers no way to edit or remove an entry once it is in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of moderation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Listing approved.
    Approved,
    /// Listing rejected.
    Rejected,
    /// Listing returned to the seller for changes.
    #[serde(alias = "requestChanges")]
    RequestChanges,
}

impl DecisionKind {
    /// Canonical display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::RequestChanges => "Returned for changes",
        }
    }
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModerationHistoryEntry {
    /// Entry identifier, unique within the listing.
    pub id: u64,
    /// Acting moderator's identifier.
    pub moderator_id: u64,
    /// Acting moderator's display name.
    pub moderator_name: String,
    /// What was decided.
    pub action: DecisionKind,
    /// Reason picked by the moderator, if any.
    #[serde(default)]
    pub reason: Option<String>,
    /// Free-text comment for the seller, if any.
    #[serde(default)]
    pub comment: Option<String>,
    /// When the decision was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Timestamp-ordered, append-only list of decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "Vec<ModerationHistoryEntry>", into = "Vec<ModerationHistoryEntry>")]
pub struct ModerationHistory(Vec<ModerationHistoryEntry>);

impl ModerationHistory {
    /// Builds a history from entries in arrival order.
    #[must_use]
    pub fn from_entries(mut entries: Vec<ModerationHistoryEntry>) -> Self {
        // Stable: entries sharing a timestamp keep their arrival order.
        entries.sort_by_key(|entry| entry.timestamp);
        Self(entries)
    }

    /// Appends an entry, keeping timestamp order.
    #[cfg(test)]
    pub(crate) fn record(&mut self, entry: ModerationHistoryEntry) {
        let at = self
            .0
            .partition_point(|existing| existing.timestamp <= entry.timestamp);
        self.0.insert(at, entry);
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, ModerationHistoryEntry> {
        self.0.iter()
    }

    /// Most recent entry, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&ModerationHistoryEntry> {
        self.0.last()
    }

    /// Number of recorded decisions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no decision was recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ModerationHistoryEntry>> for ModerationHistory {
    fn from(entries: Vec<ModerationHistoryEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<ModerationHistory> for Vec<ModerationHistoryEntry> {
    fn from(history: ModerationHistory) -> Self {
        history.0
    }
}

impl<'a> IntoIterator for &'a ModerationHistory {
    type Item = &'a ModerationHistoryEntry;
    type IntoIter = std::slice::Iter<'a, ModerationHistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
