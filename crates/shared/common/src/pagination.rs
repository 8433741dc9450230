//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

use domain::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Offset/limit pagination request (reusable across all list operations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    offset: u64,
    #[serde(default = "default_limit")]
    limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Pagination {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Build from a 1-indexed page number and page size.
    pub fn page(page: u64, per_page: u64) -> Self {
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        Self {
            offset: page
                .max(DEFAULT_PAGE_NUMBER)
                .saturating_sub(1)
                .saturating_mul(per_page),
            limit: per_page,
        }
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Page size, kept within `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// 1-indexed page the offset falls on
    pub fn page_number(&self) -> u64 {
        (self.offset / self.limit()).saturating_add(1)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper (reusable for all list responses)
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub offset: u64,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, pagination: Pagination, total: u64) -> Self {
        let per_page = pagination.limit();

        Self {
            data,
            meta: PaginationMeta {
                offset: pagination.offset(),
                page: pagination.page_number(),
                per_page,
                total,
                total_pages: total.div_ceil(per_page),
            },
        }
    }
}
