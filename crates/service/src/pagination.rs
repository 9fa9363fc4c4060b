//! Pagination utilities for service layer
//!
//! Normalizes raw `page`/`limit` request values into a limit/offset window.

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Pagination parameters as they arrive on the wire.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pagination {
    /// 1-based page index; non-positive means the first page
    pub page: i32,
    /// items per page; non-positive means the default
    pub limit: i32,
}

/// Normalized window handed to the repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

impl Pagination {
    pub fn new(page: i32, limit: i32) -> Self { Self { page, limit } }

    /// Apply defaults and the upper bound, then compute the offset.
    pub fn normalize(self) -> PageWindow {
        let limit = if self.limit <= 0 { DEFAULT_LIMIT } else { (self.limit as u64).min(MAX_LIMIT) };
        let page = if self.page <= 0 { 1 } else { self.page as u64 };
        PageWindow { page, limit, offset: (page - 1) * limit }
    }
}
