//! Listing DTOs: the query string of `GET /listings` and the listing views.

use std::collections::{BTreeMap, BTreeSet};
use std::num::IntErrorKind;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::PaginationMeta;
use crate::config::parse_bool;
use crate::domain::listing::{UnknownVariant, format_timestamp};
use crate::domain::{
    Category, DecisionKind, Listing, ListingId, ListingStatus, ModerationHistoryEntry, Priority,
    QueryPage, QueryParameters, Seller,
};
use crate::error::ConsoleError;

/// Query string of `GET /listings` and `GET /listings/{id}/neighbours`.
///
/// Sets are comma-separated. An absent set keeps the reset state; a present
/// but empty one (`statuses=`) means no restriction.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// Statuses to show, e.g. `pending,approved`.
    pub statuses: Option<String>,
    /// Category slugs or labels, e.g. `electronics,kids`.
    pub categories: Option<String>,
    /// Priorities to show, e.g. `urgent`.
    pub priorities: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<String>,
    /// Inclusive upper price bound.
    pub max_price: Option<String>,
    /// Keep only listings with a positive price (`true`/`false`).
    pub only_with_price: Option<String>,
    /// Free-text search over title, category and id.
    pub search: Option<String>,
    /// `newest-first`, `oldest-first`, `price-asc`, `price-desc` or
    /// `priority-first`.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
}

impl ListingQuery {
    /// Builds the query parameters this query string describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidQuery`] naming the first value that
    /// cannot be interpreted.
    pub fn into_parameters(self) -> Result<QueryParameters, ConsoleError> {
        let defaults = QueryParameters::default();
        Ok(QueryParameters {
            statuses: parse_set(self.statuses.as_deref(), defaults.statuses)?,
            categories: parse_set(self.categories.as_deref(), defaults.categories)?,
            priorities: parse_set(self.priorities.as_deref(), defaults.priorities)?,
            min_price: parse_scalar("min_price", self.min_price.as_deref())?,
            max_price: parse_scalar("max_price", self.max_price.as_deref())?,
            only_with_price: parse_flag("only_with_price", self.only_with_price.as_deref())?
                .unwrap_or(defaults.only_with_price),
            search: self.search.unwrap_or(defaults.search),
            sort: match self.sort.as_deref().map(str::trim) {
                None | Some("") => defaults.sort,
                Some(raw) => raw.parse().map_err(invalid)?,
            },
            page: parse_page(self.page.as_deref())?.unwrap_or(defaults.page),
        })
    }
}

fn invalid(err: UnknownVariant) -> ConsoleError {
    ConsoleError::InvalidQuery(err.to_string())
}

fn parse_set<T>(raw: Option<&str>, default: BTreeSet<T>) -> Result<BTreeSet<T>, ConsoleError>
where
    T: FromStr<Err = UnknownVariant> + Ord,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse().map_err(invalid))
        .collect()
}

fn parse_scalar<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, ConsoleError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConsoleError::InvalidQuery(format!("{name}: cannot parse {value:?}"))),
    }
}

/// Any integer is accepted and clamped into `1..=u32::MAX`; the pipeline
/// then clamps it to the last page.
fn parse_page(raw: Option<&str>) -> Result<Option<u32>, ConsoleError> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };
    let page = match value.parse::<i64>() {
        Ok(page) => u32::try_from(page.max(1)).unwrap_or(u32::MAX),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => u32::MAX,
            IntErrorKind::NegOverflow => 1,
            _ => {
                return Err(ConsoleError::InvalidQuery(format!(
                    "page: cannot parse {value:?}"
                )));
            }
        },
    };
    Ok(Some(page))
}

fn parse_flag(name: &str, raw: Option<&str>) -> Result<Option<bool>, ConsoleError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_bool(value).map(Some).ok_or_else(|| {
            ConsoleError::InvalidQuery(format!("{name}: expected a boolean, got {value:?}"))
        }),
    }
}

/// One row of the listing table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingSummaryDto {
    /// Listing identifier.
    pub id: ListingId,
    /// Title.
    pub title: String,
    /// Category label.
    pub category: Category,
    /// Category slug, as used in query strings.
    pub category_slug: &'static str,
    /// Asking price.
    pub price: f64,
    /// Price rendered for display.
    pub formatted_price: String,
    /// Moderation status.
    pub status: ListingStatus,
    /// Status display label.
    pub status_label: &'static str,
    /// Review priority.
    pub priority: Priority,
    /// Priority display label.
    pub priority_label: &'static str,
    /// Sort weight of the priority.
    pub priority_weight: u8,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Submission time rendered for display.
    pub formatted_date: String,
    /// Cover image, if any.
    pub cover_image: Option<String>,
}

impl From<&Listing> for ListingSummaryDto {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            category: listing.category,
            category_slug: listing.category.slug(),
            price: listing.price,
            formatted_price: listing.formatted_price(),
            status: listing.status,
            status_label: listing.status.label(),
            priority: listing.priority,
            priority_label: listing.priority.label(),
            priority_weight: listing.priority_weight(),
            created_at: listing.created_at,
            formatted_date: listing.formatted_date(),
            cover_image: listing.images.first().cloned(),
        }
    }
}

/// Response body for `GET /listings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingListResponse {
    /// Listings on the requested page.
    pub data: Vec<ListingSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

impl From<&QueryPage> for ListingListResponse {
    fn from(page: &QueryPage) -> Self {
        Self {
            data: page.items.iter().map(ListingSummaryDto::from).collect(),
            pagination: PaginationMeta::from(page),
        }
    }
}

/// One entry of a listing's decision trail.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryEntryDto {
    /// Entry identifier.
    pub id: u64,
    /// Acting moderator's name.
    pub moderator_name: String,
    /// Decision taken.
    pub action: DecisionKind,
    /// Decision display label.
    pub action_label: &'static str,
    /// Reason, if any.
    pub reason: Option<String>,
    /// Comment, if any.
    pub comment: Option<String>,
    /// Decision time.
    pub timestamp: DateTime<Utc>,
    /// Decision time rendered for display.
    pub formatted_timestamp: String,
}

impl From<&ModerationHistoryEntry> for HistoryEntryDto {
    fn from(entry: &ModerationHistoryEntry) -> Self {
        Self {
            id: entry.id,
            moderator_name: entry.moderator_name.clone(),
            action: entry.action,
            action_label: entry.action.label(),
            reason: entry.reason.clone(),
            comment: entry.comment.clone(),
            timestamp: entry.timestamp,
            formatted_timestamp: format_timestamp(entry.timestamp),
        }
    }
}

/// Response body for `GET /listings/{id}` and the decision endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingDetailDto {
    /// Table fields.
    #[serde(flatten)]
    pub summary: ListingSummaryDto,
    /// Description.
    pub description: String,
    /// All image URLs.
    pub images: Vec<String>,
    /// Seller profile.
    pub seller: Option<Seller>,
    /// Category-specific attributes.
    pub characteristics: BTreeMap<String, String>,
    /// Last upstream modification.
    pub updated_at: DateTime<Utc>,
    /// Decision trail, oldest first.
    pub history: Vec<HistoryEntryDto>,
}

impl From<&Listing> for ListingDetailDto {
    fn from(listing: &Listing) -> Self {
        Self {
            summary: ListingSummaryDto::from(listing),
            description: listing.description.clone(),
            images: listing.images.clone(),
            seller: listing.seller.clone(),
            characteristics: listing.characteristics.clone(),
            updated_at: listing.updated_at,
            history: listing
                .moderation_history
                .iter()
                .map(HistoryEntryDto::from)
                .collect(),
        }
    }
}

/// Response body for `POST /listings/refresh`.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct RefreshResponse {
    /// Listings now held in the working copy.
    pub listings: usize,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio_test::assert_ok;

    use super::*;
    use crate::domain::SortKey;

    #[test]
    fn absent_sets_keep_reset_state() {
        let params = assert_ok!(ListingQuery::default().into_parameters());
        assert_eq!(params, QueryParameters::default());
    }

    #[test]
    fn comma_separated_sets_parse() {
        let query = ListingQuery {
            statuses: Some("pending, rejected".into()),
            categories: Some("electronics,Мода".into()),
            priorities: Some(String::new()),
            min_price: Some("1000".into()),
            only_with_price: Some("TRUE".into()),
            sort: Some("price-desc".into()),
            page: Some("3".into()),
            ..ListingQuery::default()
        };
        let params = assert_ok!(query.into_parameters());
        assert_eq!(
            params.statuses,
            [ListingStatus::Pending, ListingStatus::Rejected].into_iter().collect()
        );
        assert_eq!(
            params.categories,
            [Category::Electronics, Category::Fashion].into_iter().collect()
        );
        assert!(params.priorities.is_empty());
        assert_eq!(params.min_price, Some(1000.0));
        assert!(params.only_with_price);
        assert_eq!(params.sort, SortKey::PriceDesc);
        assert_eq!(params.page, 3);
    }

    #[test]
    fn unknown_values_are_invalid_queries() {
        let bad_status = ListingQuery {
            statuses: Some("pending,archived".into()),
            ..ListingQuery::default()
        };
        assert!(matches!(
            bad_status.into_parameters(),
            Err(ConsoleError::InvalidQuery(msg)) if msg.contains("archived")
        ));

        let bad_price = ListingQuery {
            max_price: Some("cheap".into()),
            ..ListingQuery::default()
        };
        assert!(matches!(
            bad_price.into_parameters(),
            Err(ConsoleError::InvalidQuery(_))
        ));
    }

    fn page_of(raw: &str) -> u32 {
        let query = ListingQuery {
            page: Some(raw.into()),
            ..ListingQuery::default()
        };
        let Ok(params) = query.into_parameters() else {
            panic!("page {raw:?} should be accepted");
        };
        params.page
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        assert_eq!(page_of("-3"), 1);
        assert_eq!(page_of("0"), 1);
        assert_eq!(page_of("-99999999999999999999999"), 1);
        assert_eq!(page_of("99999999999"), u32::MAX);
        assert_eq!(page_of("99999999999999999999999"), u32::MAX);
        assert_eq!(page_of(" 7 "), 7);

        let garbage = ListingQuery {
            page: Some("second".into()),
            ..ListingQuery::default()
        };
        assert!(matches!(
            garbage.into_parameters(),
            Err(ConsoleError::InvalidQuery(msg)) if msg.contains("page")
        ));
    }

    #[test]
    fn huge_page_serves_the_last_page() {
        let listings: Vec<Listing> = (1..=23).map(crate::domain::test_support::sample_listing).collect();
        let query = ListingQuery {
            page: Some("99999999999".into()),
            ..ListingQuery::default()
        };
        let params = assert_ok!(query.into_parameters());
        let page = crate::domain::query::run_query(&listings, &params, 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn flags_accept_common_spellings() {
        for (raw, expected) in [("Yes", true), ("ON", true), ("1", true), ("off", false), ("False", false)] {
            let query = ListingQuery {
                only_with_price: Some(raw.into()),
                ..ListingQuery::default()
            };
            let params = assert_ok!(query.into_parameters());
            assert_eq!(params.only_with_price, expected, "{raw}");
        }
    }

    #[test]
    fn summary_carries_display_labels() {
        let listing = crate::domain::test_support::sample_listing(4);
        let dto = ListingSummaryDto::from(&listing);
        assert_eq!(dto.status_label, "On review");
        assert_eq!(dto.priority_label, "Normal");
        assert_eq!(dto.formatted_price, "4 000 ₽");
        assert_eq!(dto.category_slug, "electronics");
        assert!(dto.cover_image.is_some());
    }
}
