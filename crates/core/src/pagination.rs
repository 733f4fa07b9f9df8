//! Page-number pagination shared by project and task search.
//!
//! Callers supply a 1-based `page_number` and a `page_size`; repositories
//! translate them to `LIMIT`/`OFFSET` and wrap the results in a [`Page`].

use serde::Serialize;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Highest page number accepted; keeps `skip()` well inside `i64`.
pub const MAX_PAGE_NUMBER: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Normalized page request. Construct with [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Clamp user-supplied values: page number is kept within
    /// `1..=MAX_PAGE_NUMBER`, page size falls back to [`DEFAULT_PAGE_SIZE`]
    /// and is kept within `1..=MAX_PAGE_SIZE`.
    pub fn new(page_number: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page_number: page_number.unwrap_or(1).clamp(1, MAX_PAGE_NUMBER),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Rows to skip before this page starts.
    pub fn skip(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }
}

/// One page of results plus the totals needed to navigate.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: i64, request: PageRequest) -> Self {
        let total_pages = if total_count == 0 {
            0
        } else {
            (total_count + request.page_size - 1) / request.page_size
        };
        Self {
            items,
            total_count,
            page_number: request.page_number,
            page_size: request.page_size,
            total_pages,
            has_next_page: request.skip().saturating_add(request.page_size) < total_count,
            has_previous_page: request.page_number > 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
