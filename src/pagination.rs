/// Fixed-size pagination over newest-first listings.
///
/// Page numbers come from the `?page=` query parameter and are resolved
/// leniently: anything unparsable falls back to the first page, anything
/// past the end clamps to the last page. An empty listing still has one
/// (empty) page.
use serde::{Deserialize, Serialize};

/// Items per page for every post listing.
pub const PAGE_SIZE: i64 = 10;

/// Raw `?page=` query parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page number, if the parameter parsed as an integer.
    pub fn number(&self) -> Option<i64> {
        self.page.as_deref().and_then(|p| p.parse().ok())
    }

    /// True when no `page` parameter was supplied at all.
    pub fn is_default(&self) -> bool {
        self.page.is_none()
    }
}

/// Resolved position of one page within a listing.
#[derive(Debug, Clone, Copy)]
pub struct PageBounds {
    pub number: i64,
    pub limit: i64,
    pub offset: i64,
}

/// One page of a listing, ready for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Clamp a requested page number into the listing's valid range.
pub fn clamp_page(requested: Option<i64>, total_count: i64) -> PageBounds {
    let total_pages = total_pages(total_count);
    let number = requested.unwrap_or(1).clamp(1, total_pages);

    PageBounds {
        number,
        limit: PAGE_SIZE,
        offset: (number - 1) * PAGE_SIZE,
    }
}

/// Assemble a `Page` from fetched items and the bounds used to fetch them.
pub fn build_page<T>(items: Vec<T>, bounds: PageBounds, total_count: i64) -> Page<T> {
    let total_pages = total_pages(total_count);

    Page {
        items,
        number: bounds.number,
        total_pages,
        total_count,
        has_next: bounds.number < total_pages,
        has_previous: bounds.number > 1,
    }
}

fn total_pages(total_count: i64) -> i64 {
    ((total_count + PAGE_SIZE - 1) / PAGE_SIZE).max(1)
}
