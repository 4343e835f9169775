//! This module defines the common functionality for paging data.

use serde::Serialize;

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may request.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// The pagination metadata block returned alongside a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The total number of matching rows across all pages.
    pub total: u64,
    /// The 1-based page number of this page.
    pub page: u64,
    /// The number of rows per page.
    pub page_size: u64,
    /// The total number of pages.
    pub total_pages: u64,
}

impl Pagination {
    /// Build the metadata block for `total` rows split into pages of
    /// `page_size`.
    ///
    /// A `page_size` of zero is treated as one row per page rather than
    /// dividing by zero.
    pub fn new(total: u64, page: u64, page_size: u64) -> Self {
        let page_size = page_size.max(1);

        Self {
            total,
            page: page.max(1),
            page_size,
            total_pages: total.div_ceil(page_size),
        }
    }

    /// The number of rows to skip to reach this page.
    ///
    /// Saturates rather than overflowing for absurdly large page numbers;
    /// the resulting page is simply empty. The cap is `i64::MAX` because
    /// SQLite's OFFSET is a signed integer.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(i64::MAX as u64)
    }
}

/// Clamp a requested page/pageSize pair against the config defaults.
pub fn resolve_page_request(
    page: Option<u64>,
    page_size: Option<u64>,
    config: &PaginationConfig,
) -> (u64, u64) {
    let page = page.unwrap_or(config.default_page).max(1);
    let page_size = page_size
        .unwrap_or(config.default_page_size)
        .clamp(1, config.max_page_size);

    (page, page_size)
}
