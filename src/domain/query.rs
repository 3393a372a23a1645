//! Listing query pipeline: filter → search → sort → paginate.
//!
//! [`run_query`] is a pure function of the listing set and a
//! [`QueryParameters`] value. It never fails: out-of-range pages are
//! clamped, nonsensical price bounds are normalized, and an empty result
//! is still a well-formed single page.
//!
//! # Empty accepted-sets
//!
//! An empty status, category or priority set means *no restriction* on
//! that attribute, not "exclude everything". Turning every chip off in the
//! console therefore shows all listings instead of none.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::listing::{Category, Listing, ListingStatus, Priority, UnknownVariant};
use super::ListingId;

/// Listings per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Most recently created first; ties by id ascending.
    #[default]
    NewestFirst,
    /// Oldest first; ties by id ascending.
    OldestFirst,
    /// Cheapest first; ties newest first.
    PriceAsc,
    /// Most expensive first; ties newest first.
    PriceDesc,
    /// Urgent before normal; ties newest first.
    PriorityFirst,
}

impl SortKey {
    /// Every sort key.
    pub const ALL: [Self; 5] = [
        Self::NewestFirst,
        Self::OldestFirst,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::PriorityFirst,
    ];

    /// Query-string name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewestFirst => "newest-first",
            Self::OldestFirst => "oldest-first",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::PriorityFirst => "priority-first",
        }
    }

    /// Total order over listings for this key.
    ///
    /// Every key ends with the identifier as the last tie-break, so the
    /// result never depends on input order.
    #[must_use]
    pub fn compare(self, a: &Listing, b: &Listing) -> Ordering {
        let newest_first = || b.created_at.cmp(&a.created_at);
        let by_id = || a.id.cmp(&b.id);
        match self {
            Self::NewestFirst => newest_first().then_with(by_id),
            Self::OldestFirst => a.created_at.cmp(&b.created_at).then_with(by_id),
            Self::PriceAsc => a
                .price
                .total_cmp(&b.price)
                .then_with(newest_first)
                .then_with(by_id),
            Self::PriceDesc => b
                .price
                .total_cmp(&a.price)
                .then_with(newest_first)
                .then_with(by_id),
            Self::PriorityFirst => b
                .priority_weight()
                .cmp(&a.priority_weight())
                .then_with(newest_first)
                .then_with(by_id),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "sort key",
                value: s.to_string(),
            })
    }
}

/// Immutable description of what the moderator wants to see.
///
/// [`QueryParameters::default`] is the reset state: every status and both
/// priorities selected, no category restriction, no price bounds, empty
/// search, newest first, page 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct QueryParameters {
    /// Accepted statuses; empty means any.
    pub statuses: BTreeSet<ListingStatus>,
    /// Accepted categories; empty means any.
    pub categories: BTreeSet<Category>,
    /// Accepted priorities; empty means any.
    pub priorities: BTreeSet<Priority>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Keep only listings with a positive price.
    pub only_with_price: bool,
    /// Free-text search over title, category and id.
    pub search: String,
    /// Ordering of the result.
    pub sort: SortKey,
    /// Requested page, 1-based.
    pub page: u32,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            statuses: ListingStatus::ALL.into_iter().collect(),
            categories: BTreeSet::new(),
            priorities: Priority::ALL.into_iter().collect(),
            min_price: None,
            max_price: None,
            only_with_price: false,
            search: String::new(),
            sort: SortKey::default(),
            page: 1,
        }
    }
}

impl QueryParameters {
    /// Parameters with no restriction at all: every accepted-set empty.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            statuses: BTreeSet::new(),
            priorities: BTreeSet::new(),
            ..Self::default()
        }
    }

    /// Returns a copy asking for another page.
    #[must_use]
    pub fn with_page(self, page: u32) -> Self {
        Self { page, ..self }
    }

    /// Returns a copy with another sort key.
    #[must_use]
    pub fn with_sort(self, sort: SortKey) -> Self {
        Self { sort, ..self }
    }

    /// Returns a copy with another search string.
    #[must_use]
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    /// Returns a copy accepting only the given statuses.
    #[must_use]
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = ListingStatus>) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
            ..self
        }
    }

    /// Returns `true` if `listing` passes every filter and the search.
    #[must_use]
    pub fn accepts(&self, listing: &Listing) -> bool {
        Matcher::new(self).accepts(listing)
    }
}

/// Pre-normalized view of the filtering half of [`QueryParameters`].
struct Matcher<'p> {
    params: &'p QueryParameters,
    min_price: Option<f64>,
    max_price: Option<f64>,
    needle: String,
}

impl<'p> Matcher<'p> {
    fn new(params: &'p QueryParameters) -> Self {
        let (min_price, max_price) = normalize_bounds(params.min_price, params.max_price);
        Self {
            params,
            min_price,
            max_price,
            needle: params.search.trim().to_lowercase(),
        }
    }

    fn accepts(&self, listing: &Listing) -> bool {
        let p = self.params;
        accepted(&p.statuses, &listing.status)
            && accepted(&p.categories, &listing.category)
            && accepted(&p.priorities, &listing.priority)
            && (!p.only_with_price || listing.price > 0.0)
            && self.min_price.is_none_or(|min| listing.price >= min)
            && self.max_price.is_none_or(|max| listing.price <= max)
            && (self.needle.is_empty() || listing.matches_search(&self.needle))
    }
}

fn accepted<T: Ord>(set: &BTreeSet<T>, value: &T) -> bool {
    set.is_empty() || set.contains(value)
}

/// Drops non-finite bounds, clamps negative ones to zero and swaps an
/// inverted pair.
fn normalize_bounds(min: Option<f64>, max: Option<f64>) -> (Option<f64>, Option<f64>) {
    let clean = |bound: Option<f64>| bound.filter(|b| b.is_finite()).map(|b| b.max(0.0));
    match (clean(min), clean(max)) {
        (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
        bounds => bounds,
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    /// Listings on this page, in sort order.
    pub items: Vec<Listing>,
    /// Page actually served, after clamping.
    pub page: u32,
    /// Total number of pages, never below 1.
    pub total_pages: u32,
    /// Number of listings that matched before pagination.
    pub total_items: usize,
    /// Page size used.
    pub page_size: usize,
}

/// Previous and next listing around a given one under some query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Neighbours {
    /// Listing shown before, if any.
    pub previous: Option<ListingId>,
    /// Listing shown after, if any.
    pub next: Option<ListingId>,
}

/// Filters and sorts, returning every match in display order.
pub fn ordered_matches<'a, I>(listings: I, params: &QueryParameters) -> Vec<&'a Listing>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let matcher = Matcher::new(params);
    let mut matches: Vec<&Listing> = listings
        .into_iter()
        .filter(|listing| matcher.accepts(listing))
        .collect();
    matches.sort_by(|a, b| params.sort.compare(a, b));
    matches
}

/// Total number of pages for `count` items, never below 1.
#[must_use]
pub fn total_pages(count: usize, page_size: usize) -> u32 {
    let pages = count.div_ceil(page_size.max(1)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamps `page` into `[1, total_pages]`.
#[must_use]
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Runs the full pipeline and returns the requested page.
pub fn run_query<'a, I>(listings: I, params: &QueryParameters, page_size: usize) -> QueryPage
where
    I: IntoIterator<Item = &'a Listing>,
{
    let page_size = page_size.max(1);
    let matches = ordered_matches(listings, params);
    let total_items = matches.len();
    let total_pages = total_pages(total_items, page_size);
    let page = clamp_page(params.page, total_pages);

    let skip = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(page_size);
    let items = matches
        .into_iter()
        .skip(skip)
        .take(page_size)
        .cloned()
        .collect();

    QueryPage {
        items,
        page,
        total_pages,
        total_items,
        page_size,
    }
}

/// Finds the listings around `id` in the full filtered-and-sorted sequence.
///
/// Both sides are `None` when `id` itself does not match the query.
pub fn neighbours<'a, I>(listings: I, params: &QueryParameters, id: ListingId) -> Neighbours
where
    I: IntoIterator<Item = &'a Listing>,
{
    let matches = ordered_matches(listings, params);
    let Some(pos) = matches.iter().position(|listing| listing.id == id) else {
        return Neighbours::default();
    };
    Neighbours {
        previous: pos
            .checked_sub(1)
            .and_then(|i| matches.get(i))
            .map(|listing| listing.id),
        next: matches.get(pos + 1).map(|listing| listing.id),
    }
}
