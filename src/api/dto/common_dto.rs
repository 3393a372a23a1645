//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::QueryPage;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number, after clamping.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of matching items.
    pub total: u32,
    /// Total number of pages, never below 1.
    pub total_pages: u32,
}

impl From<&QueryPage> for PaginationMeta {
    fn from(page: &QueryPage) -> Self {
        Self {
            page: page.page,
            per_page: u32::try_from(page.page_size).unwrap_or(u32::MAX),
            total: u32::try_from(page.total_items).unwrap_or(u32::MAX),
            total_pages: page.total_pages,
        }
    }
}
