use serde::{Deserialize, Serialize};

/// Pagination parameters. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pageable {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    12
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_page_size(),
        }
    }
}

impl Pageable {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// `(page - 1) * limit`; page 0 is treated as page 1. Saturates instead
    /// of overflowing, so an absurd page reads past the end and comes back empty.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(pageable: &Pageable, total: u64) -> Self {
        let total_pages = if pageable.limit == 0 {
            0
        } else {
            total.div_ceil(pageable.limit)
        };
        Self {
            page: pageable.page,
            limit: pageable.limit,
            total,
            total_pages,
            has_next: pageable.page < total_pages,
            has_prev: pageable.page > 1,
        }
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, pageable: &Pageable, total: u64) -> Self {
        Self {
            data,
            pagination: Pagination::new(pageable, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(Pageable::new(1, 12).offset(), 0);
        assert_eq!(Pageable::new(3, 12).offset(), 24);
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination::new(&Pageable::new(1, 10), 21);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn last_page_has_no_next() {
        let p = Pagination::new(&Pageable::new(3, 10), 21);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let p = Pagination::new(&Pageable::new(1, 10), 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
    }

    #[test]
    fn huge_page_offset_saturates() {
        let p = Pageable::new(10_000_000_000_000_000_000, 12);
        assert_eq!(p.offset(), u64::MAX);
        assert_eq!(Pageable::new(0, 12).offset(), 0);
        assert_eq!(Pageable::new(3, 12).offset(), 24);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(Pagination::new(&Pageable::new(2, 5), 11)).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
    }
}
