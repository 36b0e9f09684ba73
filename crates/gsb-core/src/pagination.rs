//! Paging window shared by queries and grids
//!
//! The GSB API pages with a zero-based `startIndex` and a `count`. Grids ask
//! for row blocks as `[startRow, endRow)` and UIs think in 1-indexed pages;
//! both convert into a [`PageWindow`].

use serde::{Deserialize, Serialize};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Upper bound for a single page request
pub const MAX_PAGE_SIZE: u32 = 1000;

/// A window over a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    /// Zero-based index of the first row
    pub start_index: u32,
    /// Number of rows requested
    pub count: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            start_index: 0,
            count: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageWindow {
    pub fn new(start_index: u32, count: u32) -> Self {
        Self {
            start_index,
            count: count.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Create from a 1-indexed page number
    pub fn from_page(page: u32, per_page: u32) -> Self {
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        Self {
            start_index: page.max(1).saturating_sub(1) * per_page,
            count: per_page,
        }
    }

    /// Create from a grid block request `[start_row, end_row)`
    pub fn from_rows(start_row: u32, end_row: u32) -> Self {
        Self::new(start_row, end_row.saturating_sub(start_row))
    }

    /// Exclusive end index of the window
    pub fn end_index(&self) -> u32 {
        self.start_index.saturating_add(self.count)
    }

    /// 1-indexed page number this window starts on
    pub fn page(&self) -> u32 {
        self.start_index / self.count.max(1) + 1
    }

    /// The following window of the same size
    pub fn next(&self) -> Self {
        Self {
            start_index: self.end_index(),
            count: self.count,
        }
    }

    /// The preceding window, clamped at the first row
    pub fn previous(&self) -> Self {
        Self {
            start_index: self.start_index.saturating_sub(self.count),
            count: self.count,
        }
    }

    /// Whether more rows exist past this window
    pub fn has_more(&self, total: u64) -> bool {
        u64::from(self.end_index()) < total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_page() {
        let window = PageWindow::from_page(3, 20);
        assert_eq!(window.start_index, 40);
        assert_eq!(window.count, 20);
        assert_eq!(window.page(), 3);

        let first = PageWindow::from_page(0, 20);
        assert_eq!(first.start_index, 0);
    }

    #[test]
    fn test_from_rows() {
        let window = PageWindow::from_rows(100, 200);
        assert_eq!(window.start_index, 100);
        assert_eq!(window.count, 100);
        assert_eq!(window.end_index(), 200);
    }

    #[test]
    fn test_navigation() {
        let window = PageWindow::new(10, 10);
        assert_eq!(window.next().start_index, 20);
        assert_eq!(window.previous().start_index, 0);
        assert_eq!(window.previous().previous().start_index, 0);
        assert!(window.has_more(21));
        assert!(!window.has_more(20));
    }

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(PageWindow::new(0, 0).count, 1);
        assert_eq!(PageWindow::new(0, 50_000).count, MAX_PAGE_SIZE);
    }
}
