//! Paginate-until primitive
//!
//! Drives a page fetcher with `page = 1, 2, 3, ...` until the latest page's
//! stop signal says the listing is complete.

use super::types::{check_stop_condition, Page, PageRequest, PaginationState};
use crate::error::{Error, Result};
use std::future::Future;
use tracing::debug;

/// All pages of one logical query, concatenated in fetch order
pub struct PaginatedCollection<P: Page> {
    /// Records from page 1 first; never deduplicated or reordered
    pub records: Vec<P::Record>,
    /// Number of requests issued
    pub pages_fetched: u32,
    /// Metadata of the final page (its records already moved into `records`)
    pub last_page: P,
}

/// Sequential page aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    /// Page size sent with every request
    pub page_size: u32,
    /// Upper bound on requests per sweep (`None` trusts the server)
    pub max_pages: Option<u32>,
}

impl Paginator {
    /// Create an unbounded paginator
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            max_pages: None,
        }
    }

    /// Stop with `PageBudgetExceeded` instead of requesting more than `max` pages
    #[must_use]
    pub fn with_max_pages(mut self, max: Option<u32>) -> Self {
        self.max_pages = max;
        self
    }

    /// Fetch every page and concatenate the records.
    ///
    /// A failure on any page fails the whole sweep; records already fetched
    /// are dropped.
    pub async fn collect_all<P, F, Fut>(&self, mut fetch: F) -> Result<PaginatedCollection<P>>
    where
        P: Page,
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<P>>,
    {
        let mut state = PaginationState::new();
        let mut records = Vec::new();

        loop {
            let Some(page_number) = state.next_page() else {
                return Err(Error::PageBudgetExceeded { pages: state.page });
            };
            if let Some(max) = self.max_pages {
                if page_number > max {
                    return Err(Error::PageBudgetExceeded { pages: max });
                }
            }

            let request = PageRequest {
                page: page_number,
                page_size: self.page_size,
            };
            let mut page = fetch(request).await?;

            let batch = page.take_records();
            state.add_fetched(batch.len() as u64);
            records.extend(batch);

            let signal = page.stop_signal();
            debug!(
                "Fetched page {} ({:?}), {} records so far",
                state.page, signal, state.total_fetched
            );

            if check_stop_condition(signal, &state).should_stop() {
                return Ok(PaginatedCollection {
                    records,
                    pages_fetched: state.page,
                    last_page: page,
                });
            }
        }
    }
}
