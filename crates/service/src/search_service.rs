//! Paginated postcode and address searches.
//!
//! The search engine decides which titles are on a page and how many results
//! there are; Postgres decides which of those titles are still live.

use std::collections::HashMap;
use std::sync::Arc;

use digital_register_core::{
    distinct_title_numbers, normalise_postcode, page_bounds, reconcile, PageRequest,
    PaginatedTitles, SearchLimits,
};
use digital_register_search::{AddressHit, PropertySearch, SearchPage};
use digital_register_storage::traits::TitleStore;
use digital_register_storage::StorageBackend;

use crate::ServiceError;

#[derive(Debug, Clone, Copy)]
enum Query<'a> {
    Postcode(&'a str),
    Address(&'a str),
}

pub struct SearchService {
    storage: Arc<StorageBackend>,
    search: Arc<dyn PropertySearch>,
    limits: SearchLimits,
}

impl SearchService {
    #[must_use]
    pub fn new(
        storage: Arc<StorageBackend>,
        search: Arc<dyn PropertySearch>,
        limits: SearchLimits,
    ) -> Self {
        Self { storage, search, limits }
    }

    /// Titles at a postcode. `page` is the 1-based query parameter.
    pub async fn search_postcode(
        &self,
        raw_postcode: &str,
        page: Option<u64>,
    ) -> Result<PaginatedTitles, ServiceError> {
        let postcode = normalise_postcode(raw_postcode);
        if postcode.is_empty() {
            return Ok(PaginatedTitles::empty());
        }
        self.paginate(Query::Postcode(&postcode), page).await
    }

    /// Titles matching a free-text address. `page` is the 1-based query parameter.
    pub async fn search_address(
        &self,
        address: &str,
        page: Option<u64>,
    ) -> Result<PaginatedTitles, ServiceError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(PaginatedTitles::empty());
        }
        self.paginate(Query::Address(address), page).await
    }

    async fn fetch(&self, query: Query<'_>, page: PageRequest) -> Result<SearchPage, ServiceError> {
        Ok(match query {
            Query::Postcode(postcode) => self.search.search_by_postcode(postcode, page).await?,
            Query::Address(address) => self.search.search_by_address(address, page).await?,
        })
    }

    async fn paginate(
        &self,
        query: Query<'_>,
        page: Option<u64>,
    ) -> Result<PaginatedTitles, ServiceError> {
        let request = PageRequest::from_query(page, self.limits.page_size);
        let mut result = self.fetch(query, request).await?;
        if result.total == 0 {
            return Ok(PaginatedTitles::empty());
        }

        let mut bounds = page_bounds(result.total, self.limits, request.page_number);
        if bounds.was_clamped(request.page_number) {
            tracing::debug!(
                requested = request.page_number,
                last = bounds.page_number,
                "page past the end, fetching last page"
            );
            result = self.fetch(query, request.with_page_number(bounds.page_number)).await?;
            if result.total == 0 {
                return Ok(PaginatedTitles::empty());
            }
            bounds = page_bounds(result.total, self.limits, bounds.page_number);
        }

        let hit_title_numbers = self.resolve_title_numbers(&result.hits).await?;
        let rows = self
            .storage
            .get_title_registers(&distinct_title_numbers(&hit_title_numbers))
            .await?;
        let titles = reconcile(&hit_title_numbers, rows);
        tracing::debug!(
            hits = result.hits.len(),
            titles = titles.len(),
            number_results = bounds.number_results,
            "search page reconciled"
        );
        Ok(PaginatedTitles::new(titles, bounds))
    }

    /// Title numbers in hit order. Hits without a title number (address API
    /// results) are resolved through the UPRN mapping.
    async fn resolve_title_numbers(&self, hits: &[AddressHit]) -> Result<Vec<String>, ServiceError> {
        let unresolved: Vec<String> = hits
            .iter()
            .filter(|hit| hit.title_number.is_none())
            .flat_map(|hit| hit.uprns.iter().cloned())
            .collect();

        let mut by_uprn: HashMap<String, Vec<String>> = HashMap::new();
        if !unresolved.is_empty() {
            for (uprn, title_number) in self.storage.get_title_numbers_for_uprns(&unresolved).await? {
                by_uprn.entry(uprn).or_default().push(title_number);
            }
        }

        Ok(hits
            .iter()
            .flat_map(|hit| match &hit.title_number {
                Some(title_number) => vec![title_number.clone()],
                None => hit
                    .uprns
                    .iter()
                    .filter_map(|uprn| by_uprn.get(uprn))
                    .flatten()
                    .cloned()
                    .collect(),
            })
            .collect())
    }
}
