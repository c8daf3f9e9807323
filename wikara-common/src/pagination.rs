//! Pagination utilities for the dashboard table
//!
//! Fixed page size of 10 rows, plus the page-button strip shown under the
//! table.

use serde::Serialize;

/// Page size constant for all pagination
pub const PAGE_SIZE: usize = 10;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Index of the first row on the current page
    pub offset: usize,
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, total_pages]
///
/// # Examples
/// ```
/// use wikara_common::pagination::calculate_pagination;
///
/// // 23 rows = 3 pages (10 + 10 + 3)
/// let p = calculate_pagination(23, 3);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 20);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(23, 99);
/// assert_eq!(p.page, 3);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: usize) -> Pagination {
    let total_pages = total_results.div_ceil(PAGE_SIZE);
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * PAGE_SIZE;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

impl Pagination {
    /// Rows belonging to the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = (self.offset + PAGE_SIZE).min(items.len());
        &items[start..end]
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// One entry of the page-button strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageButton {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Page buttons for `current` out of `total_pages`
///
/// First page, last page, the current page and its immediate neighbours are
/// always shown. Each run of hidden pages between them collapses into one
/// ellipsis.
pub fn page_buttons(current: usize, total_pages: usize) -> Vec<PageButton> {
    let mut shown: Vec<usize> = [1, current.saturating_sub(1), current, current + 1, total_pages]
        .into_iter()
        .filter(|p| (1..=total_pages).contains(p))
        .collect();
    shown.sort_unstable();
    shown.dedup();

    let mut buttons = Vec::with_capacity(shown.len() * 2);
    let mut previous: Option<usize> = None;
    for number in shown {
        if previous.is_some_and(|p| number > p + 1) {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::Page {
            number,
            current: number == current,
        });
        previous = Some(number);
    }

    buttons
}
