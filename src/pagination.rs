//! This modules defines the common functionality for paging data.

use serde::Serialize;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
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

impl PaginationConfig {
    /// Fill in missing values with the defaults and clamp the requested values
    /// to the accepted range.
    pub fn resolve(&self, page: Option<u64>, per_page: Option<u64>) -> Page {
        Page {
            page: page.unwrap_or(self.default_page).max(1),
            per_page: per_page
                .unwrap_or(self.default_page_size)
                .clamp(1, self.max_page_size),
        }
    }
}

/// A resolved page request. Pages are numbered from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The page number, starting from one.
    pub page: u64,
    /// The maximum number of items on the page.
    pub per_page: u64,
}

impl Page {
    /// The SQL `LIMIT` for the page.
    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// The SQL `OFFSET` for the page.
    ///
    /// SQLite offsets are signed 64-bit integers, so pages past that point
    /// all map to the largest offset, which gives an empty page.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(i64::MAX as u64)
    }
}

/// One page of results and the information needed to request the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The page number, starting from one.
    pub page: u64,
    /// The maximum number of items per page.
    pub per_page: u64,
    /// The number of items across all pages.
    pub total_count: u64,
    /// The number of pages.
    pub page_count: u64,
}

impl<T> Paginated<T> {
    /// Wrap the `items` for `page` out of `total_count` items.
    pub fn new(items: Vec<T>, page: Page, total_count: u64) -> Self {
        Self {
            items,
            page: page.page,
            per_page: page.per_page,
            total_count,
            page_count: total_count.div_ceil(page.per_page),
        }
    }
}
