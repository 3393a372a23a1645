//! OpenAPI document for the console REST API.

use utoipa::OpenApi;

use super::dto::{
    BulkAction, BulkDecisionRequest, BulkDecisionResponse, HistoryEntryDto, ListingDetailDto,
    ListingListResponse, ListingSummaryDto, PaginationMeta, ReasonRequest, RefreshResponse,
    ThemeDto,
};
use super::handlers::{decision, listing, preferences, stats, system};
use crate::domain::{Neighbours, QueryParameters, StatsOverview};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification, served at `/api-docs/openapi.json`
/// when the `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "moderation-console",
        description = "Backend of the classified-ads moderation console."
    ),
    paths(
        listing::list_listings,
        listing::refresh_listings,
        listing::get_listing,
        listing::get_neighbours,
        decision::approve,
        decision::reject,
        decision::request_changes,
        decision::bulk,
        stats::get_stats,
        stats::current_moderator,
        preferences::get_theme,
        preferences::put_theme,
        preferences::toggle_theme,
        system::health_handler,
        system::reasons_handler,
        system::query_defaults_handler,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        PaginationMeta,
        ListingSummaryDto,
        ListingListResponse,
        ListingDetailDto,
        HistoryEntryDto,
        RefreshResponse,
        ReasonRequest,
        BulkAction,
        BulkDecisionRequest,
        BulkDecisionResponse,
        ThemeDto,
        Neighbours,
        QueryParameters,
        StatsOverview,
    )),
    tags(
        (name = "Listings", description = "Query and inspect the moderation queue"),
        (name = "Decisions", description = "Approve, reject or return listings"),
        (name = "Statistics", description = "Moderation statistics"),
        (name = "Preferences", description = "Console preferences"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;
