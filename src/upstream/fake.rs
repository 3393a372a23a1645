//! In-process stand-in for the moderation API.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::{ListingBatch, ModerationApi};
use crate::domain::test_support::sample_listing;
use crate::domain::{
    ActivityPoint, Decision, Listing, ListingId, ListingStatus, ModerationHistoryEntry, Moderator,
    StatsPeriod, StatsSummary,
};
use crate::error::ConsoleError;

/// Serves [`sample_listing`]s from memory. Listings in `rejecting` refuse
/// decisions; `offline` fails every call; `stall_next_list` delays the next
/// first-page fetch by five seconds.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    pub(crate) listings: Mutex<BTreeMap<ListingId, Listing>>,
    pub(crate) rejecting: HashSet<u64>,
    pub(crate) offline: AtomicBool,
    pub(crate) stall_next_list: AtomicBool,
    pub(crate) list_calls: AtomicUsize,
}

impl FakeApi {
    pub(crate) fn with_listings(count: u64) -> Self {
        let fake = Self::default();
        if let Ok(mut map) = fake.listings.lock() {
            for id in 1..=count {
                map.insert(ListingId::new(id), sample_listing(id));
            }
        }
        fake
    }

    fn check(&self) -> Result<(), ConsoleError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ConsoleError::UpstreamUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ModerationApi for FakeApi {
    async fn list_listings(&self, page: u32, limit: u32) -> Result<ListingBatch, ConsoleError> {
        self.check()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if page == 1 && self.stall_next_list.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        let all: Vec<Listing> = self
            .listings
            .lock()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        let limit = limit as usize;
        let total_pages = all.len().div_ceil(limit).max(1);
        let listings = all
            .iter()
            .skip((page as usize).saturating_sub(1) * limit)
            .take(limit)
            .cloned()
            .collect();
        Ok(ListingBatch {
            listings,
            page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_items: all.len() as u64,
        })
    }

    async fn get_listing(&self, id: ListingId) -> Result<Listing, ConsoleError> {
        self.check()?;
        self.listings
            .lock()
            .ok()
            .and_then(|map| map.get(&id).cloned())
            .ok_or(ConsoleError::ListingNotFound(id))
    }

    async fn submit_decision(
        &self,
        id: ListingId,
        decision: &Decision,
    ) -> Result<Listing, ConsoleError> {
        self.check()?;
        if self.rejecting.contains(&id.get()) {
            return Err(ConsoleError::Upstream {
                status: 500,
                message: "decision refused".into(),
            });
        }
        let Ok(mut map) = self.listings.lock() else {
            return Err(ConsoleError::Internal("poisoned".into()));
        };
        let listing = map.get_mut(&id).ok_or(ConsoleError::ListingNotFound(id))?;
        listing.status = match decision {
            Decision::Approve => ListingStatus::Approved,
            Decision::Reject { .. } => ListingStatus::Rejected,
            Decision::RequestChanges { .. } => ListingStatus::Draft,
        };
        let (reason, comment) = match decision {
            Decision::Approve => (None, None),
            Decision::Reject { reason, comment }
            | Decision::RequestChanges { reason, comment } => {
                (Some(reason.clone()), comment.clone())
            }
        };
        let entry_id = listing.moderation_history.len() as u64 + 1;
        listing.moderation_history.record(ModerationHistoryEntry {
            id: entry_id,
            moderator_id: 1,
            moderator_name: "Anna".into(),
            action: decision.kind(),
            reason,
            comment,
            timestamp: Utc::now(),
        });
        Ok(listing.clone())
    }

    async fn stats_summary(&self, _period: StatsPeriod) -> Result<StatsSummary, ConsoleError> {
        self.check()?;
        Ok(StatsSummary {
            total_reviewed: 10,
            total_reviewed_today: 2,
            total_reviewed_this_week: 6,
            total_reviewed_this_month: 10,
            approved_percentage: 50.0,
            rejected_percentage: 30.0,
            request_changes_percentage: 20.0,
            average_review_time_secs: 90.0,
        })
    }

    async fn stats_activity(
        &self,
        _period: StatsPeriod,
    ) -> Result<Vec<ActivityPoint>, ConsoleError> {
        self.check()?;
        Ok(vec![ActivityPoint {
            date: "2025-11-01".into(),
            approved: 5,
            rejected: 3,
            request_changes: 2,
        }])
    }

    async fn stats_categories(
        &self,
        _period: StatsPeriod,
    ) -> Result<BTreeMap<String, u64>, ConsoleError> {
        self.check()?;
        Ok([("Электроника".to_string(), 3), ("Мода".to_string(), 1)]
            .into_iter()
            .collect())
    }

    async fn current_moderator(&self) -> Result<Moderator, ConsoleError> {
        self.check()?;
        Ok(Moderator {
            id: 1,
            name: "Anna".into(),
            avatar_url: None,
        })
    }
}
