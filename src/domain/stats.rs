//! Aggregate moderation statistics as reported by the moderation API.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::listing::UnknownVariant;

/// Time window statistics are aggregated over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    /// Since midnight.
    Today,
    /// Last seven days.
    #[default]
    Week,
    /// Last thirty days.
    Month,
}

impl StatsPeriod {
    /// Query-string name understood by the moderation API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsPeriod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(UnknownVariant {
                kind: "period",
                value: other.to_string(),
            }),
        }
    }
}

/// Headline numbers for a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatsSummary {
    /// Listings reviewed overall.
    pub total_reviewed: u64,
    /// Listings reviewed today.
    pub total_reviewed_today: u64,
    /// Listings reviewed this week.
    pub total_reviewed_this_week: u64,
    /// Listings reviewed this month.
    pub total_reviewed_this_month: u64,
    /// Share of approvals, in percent.
    pub approved_percentage: f64,
    /// Share of rejections, in percent.
    pub rejected_percentage: f64,
    /// Share of change requests, in percent.
    pub request_changes_percentage: f64,
    /// Mean time from opening a listing to deciding, in seconds.
    pub average_review_time_secs: f64,
}

impl StatsSummary {
    /// Average review time as `mm:ss`.
    #[must_use]
    pub fn formatted_average_review_time(&self) -> String {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total = self.average_review_time_secs.max(0.0).round() as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

/// Decisions taken on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActivityPoint {
    /// Day, as reported upstream (`YYYY-MM-DD`).
    pub date: String,
    /// Approvals that day.
    pub approved: u64,
    /// Rejections that day.
    pub rejected: u64,
    /// Change requests that day.
    pub request_changes: u64,
}

impl ActivityPoint {
    /// All decisions taken that day.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.approved + self.rejected + self.request_changes
    }
}

/// Reviewed listings of one category.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryShare {
    /// Category label as reported upstream.
    pub category: String,
    /// Listings reviewed.
    pub count: u64,
    /// Share of all reviewed listings, in percent.
    pub percent: f64,
}

/// Computes percentage shares from raw per-category counts, largest first
/// (ties alphabetical).
#[must_use]
pub fn category_shares(counts: &BTreeMap<String, u64>) -> Vec<CategoryShare> {
    let total: u64 = counts.values().sum();
    let mut shares: Vec<CategoryShare> = counts
        .iter()
        .map(|(category, &count)| {
            #[allow(clippy::cast_precision_loss)]
            let percent = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            CategoryShare {
                category: category.clone(),
                count,
                percent,
            }
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    shares
}

/// Everything the statistics screen shows for one period.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatsOverview {
    /// Period the numbers cover.
    pub period: StatsPeriod,
    /// Headline numbers.
    pub summary: StatsSummary,
    /// Average review time as `mm:ss`.
    pub average_review_time: String,
    /// Per-day decision counts.
    pub activity: Vec<ActivityPoint>,
    /// Per-category distribution.
    pub categories: Vec<CategoryShare>,
}

impl StatsOverview {
    /// Assembles the overview from the three upstream answers.
    #[must_use]
    pub fn new(
        period: StatsPeriod,
        summary: StatsSummary,
        activity: Vec<ActivityPoint>,
        categories: &BTreeMap<String, u64>,
    ) -> Self {
        Self {
            period,
            average_review_time: summary.formatted_average_review_time(),
            summary,
            activity,
            categories: category_shares(categories),
        }
    }
}
