//! REST endpoint handlers organized by resource.

pub mod decision;
pub mod listing;
pub mod preferences;
pub mod stats;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(listing::routes())
        .merge(decision::routes())
        .merge(stats::routes())
        .merge(preferences::routes())
        .merge(system::api_routes())
}
