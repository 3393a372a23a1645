//! Listing fixtures shared by unit tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::ListingId;
use super::history::ModerationHistory;
use super::listing::{Category, Listing, ListingStatus, Priority};

/// Fixed reference instant; `sample_listing(n)` is created `n` hours later.
pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Pending, normal-priority electronics listing priced at `id * 1000`.
pub(crate) fn sample_listing(id: u64) -> Listing {
    let hours = i64::try_from(id).unwrap_or(0);
    let created_at = base_time() + Duration::hours(hours);
    #[allow(clippy::cast_precision_loss)]
    let price = (id * 1000) as f64;
    Listing {
        id: ListingId::new(id),
        title: format!("Listing {id}"),
        description: format!("Description of listing {id}"),
        category: Category::Electronics,
        price,
        status: ListingStatus::Pending,
        priority: Priority::Normal,
        created_at,
        updated_at: created_at,
        images: vec![format!("https://img.example/{id}/0.jpg")],
        seller: None,
        characteristics: BTreeMap::new(),
        moderation_history: ModerationHistory::default(),
    }
}
