//! Domain layer: listings, decisions, the query pipeline and the store.
//!
//! This module contains the console's model of the moderation queue: the
//! listing aggregate and its append-only history, the immutable query
//! parameters and the pure pipeline that evaluates them, the in-memory
//! working copy, and the sequencer that retires superseded requests.

pub mod decision;
pub mod history;
pub mod listing;
pub mod listing_id;
pub mod listing_store;
pub mod moderator;
pub mod preferences;
pub mod query;
pub mod sequencer;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_support;

pub use decision::Decision;
pub use history::{DecisionKind, ModerationHistory, ModerationHistoryEntry};
pub use listing::{Category, Listing, ListingStatus, Priority, Seller};
pub use listing_id::ListingId;
pub use listing_store::ListingStore;
pub use moderator::Moderator;
pub use preferences::{Preferences, Theme};
pub use query::{Neighbours, QueryPage, QueryParameters, SortKey};
pub use sequencer::{RequestSequencer, RequestTicket};
pub use stats::{ActivityPoint, StatsOverview, StatsPeriod, StatsSummary};
