//! Moderation service: keeps the working copy in step with the moderation
//! API and records decisions.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures_util::future::{join_all, try_join_all};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    Decision, Listing, ListingId, ListingStore, Moderator, Neighbours, Preferences, QueryPage,
    QueryParameters, RequestSequencer, StatsOverview, StatsPeriod, Theme,
};
use crate::error::ConsoleError;
use crate::persistence::LocalStore;
use crate::upstream::ModerationApi;

/// Result of a working-copy refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The working copy was replaced and now holds this many listings.
    Applied(usize),
    /// A newer refresh began first; this one was dropped unapplied.
    Discarded,
}

/// Result of a fully successful bulk decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Correlation id of the batch in the logs.
    pub batch_id: Uuid,
    /// Number of listings decided.
    pub decided: usize,
    /// Outcome of the refresh that followed, if it succeeded.
    pub refresh: Option<RefreshOutcome>,
}

/// Orchestration layer for all console operations.
///
/// Cheap to clone: every clone shares the same store, sequencer and
/// preferences.
#[derive(Debug, Clone)]
pub struct ModerationService {
    api: Arc<dyn ModerationApi>,
    store: Arc<ListingStore>,
    local: LocalStore,
    preferences: Arc<RwLock<Preferences>>,
    refreshes: RequestSequencer,
    page_size: usize,
    upstream_page_limit: u32,
}

impl ModerationService {
    /// Creates a service with an empty working copy.
    #[must_use]
    pub fn new(
        api: Arc<dyn ModerationApi>,
        local: LocalStore,
        page_size: usize,
        upstream_page_limit: u32,
    ) -> Self {
        Self {
            api,
            store: Arc::new(ListingStore::new()),
            local,
            preferences: Arc::new(RwLock::new(Preferences::default())),
            refreshes: RequestSequencer::new(),
            page_size: page_size.max(1),
            upstream_page_limit: upstream_page_limit.max(1),
        }
    }

    /// Listings per page of query results.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns a reference to the working copy.
    #[must_use]
    pub fn store(&self) -> &Arc<ListingStore> {
        &self.store
    }

    /// Loads the persisted working copy and preferences. Returns the number
    /// of listings restored.
    pub async fn restore(&self) -> usize {
        let listings = self.local.load_listings().await;
        let restored = self.store.replace_all(listings).await;
        let preferences = self.local.load_preferences().await;
        *self.preferences.write().await = preferences;
        tracing::info!(restored, theme = ?preferences.theme, "local state restored");
        restored
    }

    /// Reloads every listing from the moderation API.
    ///
    /// Starting a refresh supersedes any refresh still in flight; the older
    /// one is cancelled and reports [`RefreshOutcome::Discarded`].
    ///
    /// # Errors
    ///
    /// Returns the upstream error if any page cannot be fetched.
    pub async fn refresh_listings(&self) -> Result<RefreshOutcome, ConsoleError> {
        let Some((ticket, fetched)) = self.refreshes.run_latest(self.fetch_all()).await else {
            tracing::debug!(latest = self.refreshes.current(), "refresh superseded in flight");
            return Ok(RefreshOutcome::Discarded);
        };
        let listings = fetched?;
        let Some(count) = self
            .store
            .replace_all_if(listings, || ticket.is_current())
            .await
        else {
            tracing::debug!(
                generation = ticket.generation(),
                latest = self.refreshes.current(),
                "refresh superseded before apply"
            );
            return Ok(RefreshOutcome::Discarded);
        };
        tracing::info!(count, generation = ticket.generation(), "working copy refreshed");
        self.persist_listings().await;
        Ok(RefreshOutcome::Applied(count))
    }

    async fn fetch_all(&self) -> Result<Vec<Listing>, ConsoleError> {
        let limit = self.upstream_page_limit;
        let first = self.api.list_listings(1, limit).await?;
        let rest = try_join_all(
            (2..=first.total_pages).map(|page| self.api.list_listings(page, limit)),
        )
        .await?;
        let mut listings = first.listings;
        for batch in rest {
            listings.extend(batch.listings);
        }
        Ok(listings)
    }

    /// Runs the query pipeline over the working copy.
    pub async fn query(&self, params: &QueryParameters) -> QueryPage {
        self.store.query(params, self.page_size).await
    }

    /// Previous and next listing around `id` under `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::ListingNotFound`] if the listing is not in
    /// the working copy.
    pub async fn neighbours(
        &self,
        id: ListingId,
        params: &QueryParameters,
    ) -> Result<Neighbours, ConsoleError> {
        if !self.store.contains(id).await {
            return Err(ConsoleError::ListingNotFound(id));
        }
        Ok(self.store.neighbours(params, id).await)
    }

    /// Fetches the full listing from the moderation API and caches it.
    ///
    /// Falls back to the cached copy when the API cannot answer.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::ListingNotFound`] if the API does not know
    /// the listing, or the upstream error if there is no cached copy.
    pub async fn listing(&self, id: ListingId) -> Result<Listing, ConsoleError> {
        match self.api.get_listing(id).await {
            Ok(listing) => {
                self.store.upsert(listing.clone()).await;
                Ok(listing)
            }
            Err(ConsoleError::ListingNotFound(id)) => Err(ConsoleError::ListingNotFound(id)),
            Err(err) => match self.store.get(id).await {
                Ok(cached) => {
                    tracing::warn!(listing_id = %id, error = %err, "serving cached listing");
                    Ok(cached)
                }
                Err(_) => Err(err),
            },
        }
    }

    /// Records a decision against one listing.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidRequest`] for an incomplete decision,
    /// or the upstream error if the API refuses it.
    pub async fn decide(
        &self,
        id: ListingId,
        decision: Decision,
    ) -> Result<Listing, ConsoleError> {
        let decision = decision.validated()?;
        let updated = self.api.submit_decision(id, &decision).await?;
        self.store.upsert(updated.clone()).await;
        self.persist_listings().await;
        tracing::info!(listing_id = %id, action = ?decision.kind(), status = %updated.status, "decision recorded");
        Ok(updated)
    }

    /// Records the same decision against several listings at once.
    ///
    /// Submissions run concurrently. Accepted decisions stay accepted even
    /// when others fail, and the working copy is only reloaded when every
    /// submission went through.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidRequest`] for an empty selection or
    /// an incomplete decision, and [`ConsoleError::BulkDecisionFailed`]
    /// naming the listings whose submission failed.
    pub async fn bulk_decide(
        &self,
        ids: Vec<ListingId>,
        decision: Decision,
    ) -> Result<BulkOutcome, ConsoleError> {
        let decision = decision.validated()?;
        let mut seen = BTreeSet::new();
        let ids: Vec<ListingId> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        if ids.is_empty() {
            return Err(ConsoleError::InvalidRequest(
                "select at least one listing".to_string(),
            ));
        }

        let batch_id = Uuid::new_v4();
        tracing::info!(%batch_id, count = ids.len(), action = ?decision.kind(), "bulk decision started");

        let decision = &decision;
        let results = join_all(ids.iter().map(|&id| async move {
            (id, self.api.submit_decision(id, decision).await)
        }))
        .await;

        let mut failed = Vec::new();
        let mut succeeded = 0;
        for (id, result) in results {
            match result {
                Ok(listing) => {
                    succeeded += 1;
                    self.store.upsert(listing).await;
                }
                Err(err) => {
                    tracing::warn!(%batch_id, listing_id = %id, error = %err, "bulk decision failed");
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            self.persist_listings().await;
            return Err(ConsoleError::BulkDecisionFailed { failed, succeeded });
        }

        let refresh = match self.refresh_listings().await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                tracing::warn!(%batch_id, error = %err, "refresh after bulk decision failed");
                None
            }
        };
        tracing::info!(%batch_id, decided = succeeded, "bulk decision completed");
        Ok(BulkOutcome {
            batch_id,
            decided: succeeded,
            refresh,
        })
    }

    /// Statistics for a period; the three upstream reports are fetched
    /// concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first upstream error.
    pub async fn stats(&self, period: StatsPeriod) -> Result<StatsOverview, ConsoleError> {
        let (summary, activity, categories) = tokio::try_join!(
            self.api.stats_summary(period),
            self.api.stats_activity(period),
            self.api.stats_categories(period),
        )?;
        Ok(StatsOverview::new(period, summary, activity, &categories))
    }

    /// The moderator the console acts as.
    ///
    /// # Errors
    ///
    /// Returns the upstream error.
    pub async fn current_moderator(&self) -> Result<Moderator, ConsoleError> {
        self.api.current_moderator().await
    }

    /// Current colour theme.
    pub async fn theme(&self) -> Theme {
        self.preferences.read().await.theme
    }

    /// Switches to `theme` and persists the choice.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::PersistenceError`] if the preference cannot
    /// be saved; the theme stays switched for this session.
    pub async fn set_theme(&self, theme: Theme) -> Result<Theme, ConsoleError> {
        let snapshot = {
            let mut preferences = self.preferences.write().await;
            preferences.theme = theme;
            *preferences
        };
        self.local.save_preferences(&snapshot).await?;
        Ok(theme)
    }

    /// Flips between light and dark.
    ///
    /// # Errors
    ///
    /// As for [`ModerationService::set_theme`].
    pub async fn toggle_theme(&self) -> Result<Theme, ConsoleError> {
        let snapshot = {
            let mut preferences = self.preferences.write().await;
            preferences.theme = preferences.theme.toggled();
            *preferences
        };
        self.local.save_preferences(&snapshot).await?;
        Ok(snapshot.theme)
    }

    async fn persist_listings(&self) {
        if !self.local.is_enabled() {
            return;
        }
        let snapshot = self.store.snapshot().await;
        if let Err(err) = self.local.save_listings(snapshot).await {
            tracing::warn!(error = %err, "failed to persist working copy");
        }
    }
}
