//! Paging rules for joining search hits with register rows.
//!
//! The search engine and Postgres paginate independently: the engine decides
//! which titles are on a page and how many results exist overall, Postgres
//! decides which of those titles still exist. Counts always come from the
//! engine (capped at the configured maximum); the `titles` list only holds rows
//! Postgres returned, in the engine's order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{SearchLimits, TitleRegisterData};

/// A zero-based page of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Build a request from the 1-based `page` query parameter.
    ///
    /// A missing parameter, or `0`, means the first page.
    #[must_use]
    pub fn from_query(page: Option<u64>, page_size: u64) -> Self {
        Self { page_number: page.unwrap_or(1).saturating_sub(1), page_size }
    }

    #[must_use]
    pub const fn with_page_number(self, page_number: u64) -> Self {
        Self { page_number, page_size: self.page_size }
    }
}

/// The `from`/`size` slice sent to the search engine for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub from: u64,
    pub size: u64,
}

/// Slice of the result set a page covers, clipped to `max_results`.
///
/// Returns `None` when the page starts at or past the cap.
#[must_use]
pub fn search_window(page: PageRequest, max_results: u64) -> Option<SearchWindow> {
    let from = page.page_number.saturating_mul(page.page_size);
    if from >= max_results {
        return None;
    }
    let size = page.page_size.min(max_results - from);
    Some(SearchWindow { from, size })
}

/// Counts reported alongside a page of titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub number_results: u64,
    pub number_pages: u64,
    pub page_number: u64,
}

impl PageBounds {
    /// Whether the requested page had to be pulled back to the last page.
    #[must_use]
    pub const fn was_clamped(&self, requested_page: u64) -> bool {
        self.number_pages > 0 && requested_page > self.page_number
    }
}

/// Compute result and page counts from the engine's total hit count.
#[must_use]
pub fn page_bounds(total_hits: u64, limits: SearchLimits, requested_page: u64) -> PageBounds {
    let number_results = total_hits.min(limits.max_results);
    let number_pages = number_results.div_ceil(limits.page_size.max(1));
    let page_number = if number_pages == 0 { 0 } else { requested_page.min(number_pages - 1) };
    PageBounds { number_results, number_pages, page_number }
}

/// One title in a page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSummary {
    pub title_number: String,
    pub data: serde_json::Value,
}

/// Response body of the postcode and address searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedTitles {
    pub titles: Vec<TitleSummary>,
    pub number_pages: u64,
    pub page_number: u64,
    pub number_results: u64,
}

impl PaginatedTitles {
    #[must_use]
    pub const fn empty() -> Self {
        Self { titles: Vec::new(), number_pages: 0, page_number: 0, number_results: 0 }
    }

    #[must_use]
    pub fn new(titles: Vec<TitleSummary>, bounds: PageBounds) -> Self {
        Self {
            titles,
            number_pages: bounds.number_pages,
            page_number: bounds.page_number,
            number_results: bounds.number_results,
        }
    }
}

/// Order register rows the way the search engine ranked them.
///
/// Hits without a row (soft-deleted, or missing from Postgres) are dropped.
/// A title hit more than once appears once, at its first position.
#[must_use]
pub fn reconcile(hit_title_numbers: &[String], rows: Vec<TitleRegisterData>) -> Vec<TitleSummary> {
    let mut by_number: HashMap<String, TitleRegisterData> =
        rows.into_iter().map(|row| (row.title_number.clone(), row)).collect();

    hit_title_numbers
        .iter()
        .filter_map(|number| by_number.remove(number))
        .map(|row| TitleSummary { title_number: row.title_number, data: row.register_data })
        .collect()
}

/// Title numbers in hit order with duplicates removed, for the batch row lookup.
#[must_use]
pub fn distinct_title_numbers(hit_title_numbers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    hit_title_numbers.iter().filter(|n| seen.insert(n.as_str())).cloned().collect()
}
