//! Wire shapes of the moderation API.
//!
//! The API speaks camelCase JSON. These types mirror it field for field and
//! convert into the domain model, tolerating the looser parts of the
//! format (string or numeric seller ratings, blank comments, categories
//! identified by id or by label).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ActivityPoint, Category, DecisionKind, Listing, ListingId, ListingStatus, ModerationHistory,
    ModerationHistoryEntry, Moderator, Priority, Seller, StatsSummary,
};
use crate::error::ConsoleError;

/// `GET /ads` response.
#[derive(Debug, Deserialize)]
pub struct AdsPage {
    /// Listings on the page.
    pub ads: Vec<Advertisement>,
    /// Paging metadata.
    pub pagination: WirePagination,
}

/// Paging metadata of `GET /ads`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePagination {
    /// 1-based page number.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of listings.
    pub total_items: u64,
    /// Page size used by the API.
    #[serde(default)]
    pub items_per_page: u32,
}

/// Response of the decision endpoints.
#[derive(Debug, Deserialize)]
pub struct DecisionAck {
    /// The listing after the decision was applied.
    pub ad: Advertisement,
}

/// Body of the reject and request-changes endpoints.
#[derive(Debug, Serialize)]
pub struct ReasonBody<'a> {
    /// Reason for the decision.
    pub reason: &'a str,
    /// Free-form comment, empty when none was given.
    pub comment: &'a str,
}

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    /// Error message.
    pub error: serde_json::Value,
}

impl ErrorEnvelope {
    /// The message as plain text.
    #[must_use]
    pub fn message(self) -> String {
        match self.error {
            serde_json::Value::String(message) => message,
            serde_json::Value::Object(mut map) => match map.remove("message") {
                Some(serde_json::Value::String(message)) => message,
                _ => serde_json::Value::Object(map).to_string(),
            },
            other => other.to_string(),
        }
    }
}

/// A listing as the API serializes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    /// Listing id.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Asking price.
    pub price: f64,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Numeric category id.
    #[serde(default)]
    pub category_id: Option<u32>,
    /// Review status.
    pub status: ListingStatus,
    /// Review priority.
    pub priority: Priority,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Seller profile.
    #[serde(default)]
    pub seller: Option<WireSeller>,
    /// Free-form attributes.
    #[serde(default)]
    pub characteristics: BTreeMap<String, String>,
    /// Decision log.
    #[serde(default)]
    pub moderation_history: Vec<WireHistoryEntry>,
}

/// Seller as the API serializes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSeller {
    /// Seller id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Rating, sent as a string or a number.
    #[serde(default)]
    pub rating: serde_json::Value,
    /// Listings published by the seller.
    #[serde(default)]
    pub total_ads: u32,
    /// Registration time.
    pub registered_at: DateTime<Utc>,
}

/// History entry as the API serializes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireHistoryEntry {
    /// Entry id.
    pub id: u64,
    /// Moderator id.
    pub moderator_id: u64,
    /// Moderator name.
    pub moderator_name: String,
    /// Decision taken.
    pub action: DecisionKind,
    /// Reason, if any.
    #[serde(default)]
    pub reason: Option<String>,
    /// Comment, possibly blank.
    #[serde(default)]
    pub comment: Option<String>,
    /// Decision time.
    pub timestamp: DateTime<Utc>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<WireHistoryEntry> for ModerationHistoryEntry {
    fn from(wire: WireHistoryEntry) -> Self {
        Self {
            id: wire.id,
            moderator_id: wire.moderator_id,
            moderator_name: wire.moderator_name,
            action: wire.action,
            reason: non_blank(wire.reason),
            comment: non_blank(wire.comment),
            timestamp: wire.timestamp,
        }
    }
}

impl From<WireSeller> for Seller {
    fn from(wire: WireSeller) -> Self {
        let rating = match wire.rating {
            serde_json::Value::String(rating) => rating,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        Self {
            id: wire.id,
            name: wire.name,
            rating,
            total_ads: wire.total_ads,
            registered_at: wire.registered_at,
        }
    }
}

impl TryFrom<Advertisement> for Listing {
    type Error = ConsoleError;

    fn try_from(wire: Advertisement) -> Result<Self, Self::Error> {
        let category = wire
            .category_id
            .and_then(Category::from_id)
            .or_else(|| wire.category.as_deref().and_then(|c| c.parse().ok()))
            .ok_or_else(|| {
                ConsoleError::UpstreamUnavailable(format!(
                    "listing {} has unknown category {:?}",
                    wire.id,
                    wire.category.as_deref().unwrap_or("")
                ))
            })?;
        Ok(Self {
            id: ListingId::new(wire.id),
            title: wire.title,
            description: wire.description,
            category,
            price: wire.price,
            status: wire.status,
            priority: wire.priority,
            created_at: wire.created_at,
            updated_at: wire.updated_at.unwrap_or(wire.created_at),
            images: wire.images,
            seller: wire.seller.map(Seller::from),
            characteristics: wire.characteristics,
            moderation_history: ModerationHistory::from_entries(
                wire.moderation_history
                    .into_iter()
                    .map(ModerationHistoryEntry::from)
                    .collect(),
            ),
        })
    }
}

/// `GET /stats/summary` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStatsSummary {
    /// Listings reviewed overall.
    pub total_reviewed: u64,
    /// Listings reviewed today.
    #[serde(default)]
    pub total_reviewed_today: u64,
    /// Listings reviewed this week.
    #[serde(default)]
    pub total_reviewed_this_week: u64,
    /// Listings reviewed this month.
    #[serde(default)]
    pub total_reviewed_this_month: u64,
    /// Approval share, percent.
    #[serde(default)]
    pub approved_percentage: f64,
    /// Rejection share, percent.
    #[serde(default)]
    pub rejected_percentage: f64,
    /// Change-request share, percent.
    #[serde(default)]
    pub request_changes_percentage: f64,
    /// Mean review time in seconds.
    #[serde(default)]
    pub average_review_time: f64,
}

impl From<WireStatsSummary> for StatsSummary {
    fn from(wire: WireStatsSummary) -> Self {
        Self {
            total_reviewed: wire.total_reviewed,
            total_reviewed_today: wire.total_reviewed_today,
            total_reviewed_this_week: wire.total_reviewed_this_week,
            total_reviewed_this_month: wire.total_reviewed_this_month,
            approved_percentage: wire.approved_percentage,
            rejected_percentage: wire.rejected_percentage,
            request_changes_percentage: wire.request_changes_percentage,
            average_review_time_secs: wire.average_review_time,
        }
    }
}

/// One point of `GET /stats/chart/activity`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireActivityPoint {
    /// Day.
    pub date: String,
    /// Approvals.
    #[serde(default)]
    pub approved: u64,
    /// Rejections.
    #[serde(default)]
    pub rejected: u64,
    /// Change requests.
    #[serde(default)]
    pub request_changes: u64,
}

impl From<WireActivityPoint> for ActivityPoint {
    fn from(wire: WireActivityPoint) -> Self {
        Self {
            date: wire.date,
            approved: wire.approved,
            rejected: wire.rejected,
            request_changes: wire.request_changes,
        }
    }
}

/// `GET /moderators/me` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireModerator {
    /// Moderator id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl From<WireModerator> for Moderator {
    fn from(wire: WireModerator) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            avatar_url: non_blank(wire.avatar_url),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const AD: &str = r#"{
        "id": 12,
        "title": "iPhone 13",
        "description": "Good condition",
        "price": 54000,
        "category": "Электроника",
        "categoryId": 0,
        "status": "pending",
        "priority": "urgent",
        "createdAt": "2025-11-01T10:00:00.000Z",
        "updatedAt": "2025-11-02T10:00:00.000Z",
        "images": ["https://img/1.jpg"],
        "seller": {
            "id": 3, "name": "Ivan", "rating": "4.8",
            "totalAds": 17, "registeredAt": "2023-01-01T00:00:00.000Z"
        },
        "characteristics": {"Color": "Black"},
        "moderationHistory": [
            {"id": 2, "moderatorId": 1, "moderatorName": "Anna",
             "action": "requestChanges", "reason": "Photo problems", "comment": "",
             "timestamp": "2025-11-02T09:00:00.000Z"},
            {"id": 1, "moderatorId": 1, "moderatorName": "Anna",
             "action": "rejected", "reason": "Other", "comment": "dup",
             "timestamp": "2025-11-01T11:00:00.000Z"}
        ]
    }"#;

    #[test]
    fn advertisement_converts_to_listing() {
        let Ok(wire) = serde_json::from_str::<Advertisement>(AD) else {
            panic!("fixture should parse");
        };
        let Ok(listing) = Listing::try_from(wire) else {
            panic!("fixture should convert");
        };
        assert_eq!(listing.id.get(), 12);
        assert_eq!(listing.category, Category::Electronics);
        assert_eq!(listing.priority, Priority::Urgent);
        assert_eq!(listing.characteristics.get("Color").map(String::as_str), Some("Black"));
        let Some(seller) = listing.seller.as_ref() else {
            panic!("seller should be present");
        };
        assert_eq!(seller.rating, "4.8");

        let history: Vec<u64> = listing.moderation_history.iter().map(|e| e.id).collect();
        assert_eq!(history, vec![1, 2]);
        let Some(latest) = listing.moderation_history.latest() else {
            panic!("history should not be empty");
        };
        assert_eq!(latest.action, DecisionKind::RequestChanges);
        assert_eq!(latest.comment, None);
    }

    #[test]
    fn numeric_rating_becomes_text() {
        let seller = WireSeller {
            id: 1,
            name: "Olga".into(),
            rating: serde_json::json!(4.5),
            total_ads: 2,
            registered_at: Utc::now(),
        };
        assert_eq!(Seller::from(seller).rating, "4.5");
    }

    #[test]
    fn unknown_category_is_an_upstream_error() {
        let Ok(mut wire) = serde_json::from_str::<Advertisement>(AD) else {
            panic!("fixture should parse");
        };
        wire.category_id = Some(99);
        wire.category = Some("Космос".into());
        assert!(matches!(
            Listing::try_from(wire),
            Err(ConsoleError::UpstreamUnavailable(_))
        ));
    }

    #[test]
    fn error_envelope_accepts_string_or_object() {
        let Ok(plain) = serde_json::from_str::<ErrorEnvelope>(r#"{"error":"Ad not found"}"#)
        else {
            panic!("string error should parse");
        };
        assert_eq!(plain.message(), "Ad not found");

        let Ok(nested) =
            serde_json::from_str::<ErrorEnvelope>(r#"{"error":{"message":"bad reason"}}"#)
        else {
            panic!("object error should parse");
        };
        assert_eq!(nested.message(), "bad reason");
    }
}
