//! Client side of the moderation API.
//!
//! The console owns no listing data: every listing, decision and statistic
//! comes from the moderation API. [`ModerationApi`] is the seam the service
//! layer talks to; [`HttpModerationApi`] implements it over HTTP with
//! `reqwest`, and tests substitute in-process fakes.

pub mod client;
#[cfg(test)]
pub(crate) mod fake;
pub mod wire;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use client::HttpModerationApi;

use crate::domain::{
    ActivityPoint, Decision, Listing, ListingId, Moderator, StatsPeriod, StatsSummary,
};
use crate::error::ConsoleError;

/// One page of listings as served by the moderation API.
#[derive(Debug, Clone, Default)]
pub struct ListingBatch {
    /// Listings on this page.
    pub listings: Vec<Listing>,
    /// 1-based page number.
    pub page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of listings across all pages.
    pub total_items: u64,
}

/// Operations the console needs from the moderation API.
#[async_trait]
pub trait ModerationApi: Send + Sync + std::fmt::Debug {
    /// Fetches one page of the listing catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Upstream`] or [`ConsoleError::UpstreamUnavailable`]
    /// when the API refuses or cannot be reached.
    async fn list_listings(&self, page: u32, limit: u32) -> Result<ListingBatch, ConsoleError>;

    /// Fetches a single listing with its full history.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::ListingNotFound`] if the API does not know
    /// the listing, otherwise as for [`ModerationApi::list_listings`].
    async fn get_listing(&self, id: ListingId) -> Result<Listing, ConsoleError>;

    /// Submits a decision and returns the listing as updated upstream.
    ///
    /// # Errors
    ///
    /// As for [`ModerationApi::get_listing`].
    async fn submit_decision(
        &self,
        id: ListingId,
        decision: &Decision,
    ) -> Result<Listing, ConsoleError>;

    /// Headline statistics for a period.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Upstream`] or [`ConsoleError::UpstreamUnavailable`]
    /// when the API refuses or cannot be reached.
    async fn stats_summary(&self, period: StatsPeriod) -> Result<StatsSummary, ConsoleError>;

    /// Per-day decision counts for a period.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Upstream`] or [`ConsoleError::UpstreamUnavailable`]
    /// when the API refuses or cannot be reached.
    async fn stats_activity(&self, period: StatsPeriod)
    -> Result<Vec<ActivityPoint>, ConsoleError>;

    /// Reviewed listings per category for a period.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Upstream`] or [`ConsoleError::UpstreamUnavailable`]
    /// when the API refuses or cannot be reached.
    async fn stats_categories(
        &self,
        period: StatsPeriod,
    ) -> Result<BTreeMap<String, u64>, ConsoleError>;

    /// The moderator the console acts as.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Upstream`] or [`ConsoleError::UpstreamUnavailable`]
    /// when the API refuses or cannot be reached.
    async fn current_moderator(&self) -> Result<Moderator, ConsoleError>;
}
