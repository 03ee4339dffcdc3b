//! Pagination component for navigating through multi-page tables.
//!
//! Renders Previous/Next controls around a "Page x of y" label, keeping
//! the page's filter, sort and tab parameters in every link.

use maud::{html, Markup, Render};
use urlencoding::encode;

/// Append URL-encoded query parameters to a path.
#[must_use]
pub fn with_query(base_url: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return base_url.to_string();
    }
    let query = params
        .iter()
        .map(|(name, value)| format!("{name}={}", encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base_url}?{query}")
}

/// Pagination component for navigating through multi-page content.
#[derive(Debug, Clone)]
pub struct Pagination {
    /// Current page number (0-indexed internally, displayed as 1-indexed)
    pub current_page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Base URL for page links (query params will be appended)
    pub base_url: String,
    /// Parameters preserved in every link, in order
    pub params: Vec<(&'static str, String)>,
}

impl Pagination {
    /// Create a new pagination component.
    ///
    /// # Arguments
    /// * `current_page` - Current page number (0-indexed)
    /// * `total_pages` - Total number of pages
    /// * `base_url` - Base URL for page links
    #[must_use]
    pub fn new(current_page: usize, total_pages: usize, base_url: &str) -> Self {
        Self {
            current_page,
            total_pages,
            base_url: base_url.to_string(),
            params: Vec::new(),
        }
    }

    /// Preserve parameters in pagination links. A `page` entry is dropped.
    #[must_use]
    pub fn with_params(mut self, params: Vec<(&'static str, String)>) -> Self {
        self.params = params.into_iter().filter(|(k, _)| *k != "page").collect();
        self
    }

    /// Build URL for a specific page number with all parameters preserved.
    fn build_url(&self, page_num: usize) -> String {
        let mut params = self.params.clone();
        if page_num > 0 {
            params.push(("page", page_num.to_string()));
        }
        with_query(&self.base_url, &params)
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_page > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }
}

impl Render for Pagination {
    fn render(&self) -> Markup {
        let current = self.current_page;
        let total = self.total_pages.max(1);

        html! {
            nav class="pagination" aria-label="Table pages" {
                @if self.has_previous() {
                    a class="button button-outline" href=(self.build_url(current - 1)) { "Previous" }
                } @else {
                    span class="button button-outline disabled" aria-disabled="true" { "Previous" }
                }

                span class="page-status" { "Page " (current + 1) " of " (total) }

                @if self.has_next() {
                    a class="button button-outline" href=(self.build_url(current + 1)) { "Next" }
                } @else {
                    span class="button button-outline disabled" aria-disabled="true" { "Next" }
                }
            }
        }
    }
}
