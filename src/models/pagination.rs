// src/models/pagination.rs
// DOCUMENTATION: Page number resolution for venue listings
// PURPOSE: Clamp requested pages into range

use serde::Serialize;

/// Venues shown per listing page
pub const VENUES_PER_PAGE: i64 = 12;

/// Resolved page metadata returned alongside listing results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Current page (1-based)
    pub number: i64,
    /// Total number of pages (never less than 1)
    pub num_pages: i64,
    pub per_page: i64,
    /// Total matching rows
    pub total_count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    /// Resolve a raw `page` query value against a result count.
    ///
    /// Anything that is not an integer yields the first page; integers
    /// outside `1..=num_pages` yield the last page.
    pub fn resolve(requested: Option<&str>, total_count: i64, per_page: i64) -> Self {
        let per_page = per_page.max(1);
        let num_pages = ((total_count.max(0) + per_page - 1) / per_page).max(1);

        let number = match requested.map(str::trim).and_then(|p| p.parse::<i64>().ok()) {
            None => 1,
            Some(n) if n < 1 || n > num_pages => num_pages,
            Some(n) => n,
        };

        PageInfo {
            number,
            num_pages,
            per_page,
            total_count,
            has_next: number < num_pages,
            has_previous: number > 1,
        }
    }

    /// Row offset for the SQL query
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_page_is_first() {
        let page = PageInfo::resolve(None, 30, 12);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 3);
        assert!(page.has_next);
        assert!(!page.has_previous);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_non_numeric_page_is_first() {
        assert_eq!(PageInfo::resolve(Some("abc"), 30, 12).number, 1);
    }

    #[test]
    fn test_out_of_range_page_is_last() {
        assert_eq!(PageInfo::resolve(Some("99"), 30, 12).number, 3);
        assert_eq!(PageInfo::resolve(Some("0"), 30, 12).number, 3);
        assert_eq!(PageInfo::resolve(Some("-2"), 30, 12).number, 3);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let page = PageInfo::resolve(Some("4"), 0, 12);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(!page.has_next);
    }

    #[test]
    fn test_offset_of_last_page() {
        let page = PageInfo::resolve(Some("3"), 25, 12);
        assert_eq!(page.offset(), 24);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }
}
