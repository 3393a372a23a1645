//! In-memory working copy of the moderation queue.
//!
//! [`ListingStore`] holds every listing the moderation API last reported,
//! keyed by [`ListingId`]. It is a read-mostly cache: a refresh replaces
//! the whole map under one write lock, and an accepted decision upserts
//! the single listing the API returned. Queries run over a read-locked
//! view, so readers never observe a half-applied refresh.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::ListingId;
use super::listing::Listing;
use super::query::{self, Neighbours, QueryPage, QueryParameters};
use crate::error::ConsoleError;

/// Central store for the listings currently under review.
#[derive(Debug, Default)]
pub struct ListingStore {
    listings: RwLock<BTreeMap<ListingId, Listing>>,
}

impl ListingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole working copy. Returns the number of listings now
    /// held (duplicates in `listings` collapse to the last one).
    pub async fn replace_all(&self, listings: Vec<Listing>) -> usize {
        let fresh: BTreeMap<ListingId, Listing> =
            listings.into_iter().map(|l| (l.id, l)).collect();
        let count = fresh.len();
        *self.listings.write().await = fresh;
        count
    }

    /// Replaces the whole working copy if `still_wanted` holds once the
    /// write lock is taken. Returns the new count, or `None` when the
    /// replacement was abandoned.
    pub async fn replace_all_if(
        &self,
        listings: Vec<Listing>,
        still_wanted: impl FnOnce() -> bool,
    ) -> Option<usize> {
        let fresh: BTreeMap<ListingId, Listing> =
            listings.into_iter().map(|l| (l.id, l)).collect();
        let mut map = self.listings.write().await;
        if !still_wanted() {
            return None;
        }
        let count = fresh.len();
        *map = fresh;
        Some(count)
    }

    /// Inserts or replaces one listing.
    pub async fn upsert(&self, listing: Listing) {
        self.listings.write().await.insert(listing.id, listing);
    }

    /// Returns a copy of the listing.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::ListingNotFound`] if the listing is not in
    /// the working copy.
    pub async fn get(&self, id: ListingId) -> Result<Listing, ConsoleError> {
        self.listings
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ConsoleError::ListingNotFound(id))
    }

    /// Returns `true` if the listing is in the working copy.
    pub async fn contains(&self, id: ListingId) -> bool {
        self.listings.read().await.contains_key(&id)
    }

    /// Returns every listing, ordered by id.
    pub async fn snapshot(&self) -> Vec<Listing> {
        self.listings.read().await.values().cloned().collect()
    }

    /// Runs the query pipeline over the working copy.
    pub async fn query(&self, params: &QueryParameters, page_size: usize) -> QueryPage {
        let map = self.listings.read().await;
        query::run_query(map.values(), params, page_size)
    }

    /// Previous/next listing around `id` under `params`.
    pub async fn neighbours(&self, params: &QueryParameters, id: ListingId) -> Neighbours {
        let map = self.listings.read().await;
        query::neighbours(map.values(), params, id)
    }

    /// Returns the number of listings held.
    pub async fn len(&self) -> usize {
        self.listings.read().await.len()
    }

    /// Returns `true` if the store holds no listings.
    pub async fn is_empty(&self) -> bool {
        self.listings.read().await.is_empty()
    }
}
