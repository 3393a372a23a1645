//! Listing aggregate and its enumerated attributes.
//!
//! A [`Listing`] is the console's working copy of one advertisement as last
//! reported by the moderation API. Only the moderation API changes a
//! listing's status; the console replaces its copy after every accepted
//! decision and never deletes listings.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ListingId;
use super::history::ModerationHistory;

/// Error returned when an enumerated listing attribute cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Attribute that failed to parse (e.g. `"status"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Moderation status of a listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Waiting for a moderator decision.
    Pending,
    /// Approved and published.
    Approved,
    /// Rejected by a moderator.
    Rejected,
    /// Saved by the seller but not yet submitted.
    Draft,
}

impl ListingStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Rejected, Self::Draft];

    /// Wire name used by the moderation API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Draft => "draft",
        }
    }

    /// Canonical display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "On review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Draft => "Draft",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("status", s))
    }
}

/// Review priority of a listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Regular queue position.
    Normal,
    /// Paid or flagged listings reviewed first.
    Urgent,
}

impl Priority {
    /// Both priorities.
    pub const ALL: [Self; 2] = [Self::Normal, Self::Urgent];

    /// Sort weight: urgent listings outrank normal ones.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Urgent => 2,
        }
    }

    /// Wire name used by the moderation API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Urgent => "urgent",
        }
    }

    /// Canonical display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Urgent => "Urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("priority", s))
    }
}

/// Advertisement category.
///
/// Serialized with the label the moderation API sends; the ASCII slug is
/// accepted as an alias and used in query strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum Category {
    /// Electronics.
    #[serde(rename = "Электроника", alias = "electronics")]
    Electronics,
    /// Real estate.
    #[serde(rename = "Недвижимость", alias = "real-estate")]
    RealEstate,
    /// Vehicles.
    #[serde(rename = "Транспорт", alias = "transport")]
    Transport,
    /// Jobs and vacancies.
    #[serde(rename = "Работа", alias = "jobs")]
    Jobs,
    /// Services.
    #[serde(rename = "Услуги", alias = "services")]
    Services,
    /// Pets and animals.
    #[serde(rename = "Животные", alias = "animals")]
    Animals,
    /// Clothing and fashion.
    #[serde(rename = "Мода", alias = "fashion")]
    Fashion,
    /// Goods for children.
    #[serde(rename = "Детское", alias = "kids")]
    Kids,
}

impl Category {
    /// Every category, ordered by upstream `categoryId`.
    pub const ALL: [Self; 8] = [
        Self::Electronics,
        Self::RealEstate,
        Self::Transport,
        Self::Jobs,
        Self::Services,
        Self::Animals,
        Self::Fashion,
        Self::Kids,
    ];

    /// Label as sent by the moderation API.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Электроника",
            Self::RealEstate => "Недвижимость",
            Self::Transport => "Транспорт",
            Self::Jobs => "Работа",
            Self::Services => "Услуги",
            Self::Animals => "Животные",
            Self::Fashion => "Мода",
            Self::Kids => "Детское",
        }
    }

    /// ASCII slug used in query strings.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::RealEstate => "real-estate",
            Self::Transport => "transport",
            Self::Jobs => "jobs",
            Self::Services => "services",
            Self::Animals => "animals",
            Self::Fashion => "fashion",
            Self::Kids => "kids",
        }
    }

    /// Maps an upstream `categoryId` to its category.
    #[must_use]
    pub fn from_id(id: u32) -> Option<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Returns `true` if `needle` (already lowercased) occurs in the label
    /// or the slug.
    #[must_use]
    pub fn contains(self, needle: &str) -> bool {
        self.label().to_lowercase().contains(needle) || self.slug().contains(needle)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == lowered || c.label().to_lowercase() == lowered)
            .ok_or_else(|| UnknownVariant::new("category", s))
    }
}

/// Seller profile attached to a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Seller {
    /// Seller identifier in the marketplace.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Average rating, as reported upstream (e.g. `"4.8"`).
    pub rating: String,
    /// Number of advertisements the seller has placed.
    pub total_ads: u32,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

/// The console's copy of one advertisement under moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Listing {
    /// Immutable identifier.
    pub id: ListingId,
    /// Advertisement title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Category from the fixed set.
    pub category: Category,
    /// Asking price in roubles.
    pub price: f64,
    /// Moderation status.
    pub status: ListingStatus,
    /// Review priority.
    pub priority: Priority,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Last upstream modification.
    pub updated_at: DateTime<Utc>,
    /// Image URLs, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    /// Seller profile, when the API provides one.
    #[serde(default)]
    pub seller: Option<Seller>,
    /// Category-specific attributes.
    #[serde(default)]
    pub characteristics: BTreeMap<String, String>,
    /// Append-only decision trail.
    #[serde(default)]
    pub moderation_history: ModerationHistory,
}

impl Listing {
    /// Sort weight derived from the priority.
    #[must_use]
    pub const fn priority_weight(&self) -> u8 {
        self.priority.weight()
    }

    /// Price rendered for display, e.g. `"89 000 ₽"`.
    #[must_use]
    pub fn formatted_price(&self) -> String {
        format_price(self.price)
    }

    /// Creation time rendered for display, e.g. `"12.11.2025, 10:14"`.
    #[must_use]
    pub fn formatted_date(&self) -> String {
        format_timestamp(self.created_at)
    }

    /// Returns `true` if the lowercased `needle` occurs in the title, the
    /// category, or the decimal identifier.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.category.contains(needle)
            || self.id.to_string().contains(needle)
    }
}

/// Formats a timestamp as `dd.mm.yyyy, HH:MM` (UTC).
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%d.%m.%Y, %H:%M").to_string()
}

/// Formats a rouble amount with space-grouped thousands and at most two
/// fraction digits.
#[must_use]
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "n/a".to_string();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let kopecks = (price.abs() * 100.0).round() as u64;
    let mut out = String::new();
    if price < 0.0 && kopecks != 0 {
        out.push('-');
    }
    out.push_str(&group_thousands(kopecks / 100));
    let fraction = kopecks % 100;
    if fraction != 0 {
        out.push_str(&format!(",{fraction:02}"));
    }
    out.push_str(" ₽");
    out
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
