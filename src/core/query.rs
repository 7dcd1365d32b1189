//! Listing query parameters and pagination

use crate::core::route::Route;
use serde::{Deserialize, Serialize};

/// Rows shown per listing page
pub const ITEMS_PER_PAGE: u32 = 6;

/// Query parameters of the invoice listing
///
/// ```text
/// GET /dashboard/invoices?query=lee&page=2
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Free-text search; empty matches everything
    pub query: String,

    /// Page number as submitted; anything unparsable or below 1 means page 1
    pub page: Option<String>,
}

impl ListQuery {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page: Some(page.to_string()),
        }
    }

    /// Search text with surrounding whitespace removed
    pub fn search(&self) -> &str {
        self.query.trim()
    }

    /// Current page, at least 1
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }

    /// Row offset of the current page
    pub fn offset(&self) -> u32 {
        (self.page() - 1).saturating_mul(ITEMS_PER_PAGE)
    }

    /// Cache variant key, stable for equivalent queries
    pub fn cache_key(&self) -> String {
        format!("query={}&page={}", self.search(), self.page())
    }

    /// URL of another page of the same search
    pub fn page_href(&self, page: u32) -> String {
        format!("{}?{}", Route::Invoices.path(), self.query_string(page))
    }

    /// Delete target for invoice `id` that returns to this page of this search
    pub fn delete_href(&self, id: &str) -> String {
        format!(
            "{}?{}",
            Route::delete_invoice(id),
            self.query_string(self.page())
        )
    }

    fn query_string(&self, page: u32) -> String {
        match self.search() {
            "" => format!("page={}", page),
            search => format!("page={}&query={}", page, urlencoding::encode(search)),
        }
    }
}

/// Number of pages needed for `count` rows
pub fn total_pages(count: u64) -> u32 {
    count.div_ceil(u64::from(ITEMS_PER_PAGE)) as u32
}

/// One slot of the pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Pages to display around `current`, eliding the middle of long ranges.
///
/// - seven pages or fewer: every page
/// - near the start: `1 2 3 … n-1 n`
/// - near the end: `1 2 … n-2 n-1 n`
/// - otherwise: `1 … c-1 c c+1 … n`
pub fn pagination(current: u32, total: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= 7 {
        return (1..=total).map(Page).collect();
    }
    if current <= 3 {
        return vec![Page(1), Page(2), Page(3), Ellipsis, Page(total - 1), Page(total)];
    }
    if current >= total - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total - 2),
            Page(total - 1),
            Page(total),
        ];
    }
    vec![
        Page(1),
        Ellipsis,
        Page(current - 1),
        Page(current),
        Page(current + 1),
        Ellipsis,
        Page(total),
    ]
}
