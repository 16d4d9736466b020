//! Pagination types and traits
//!
//! Defines the core pagination abstractions shared by every paged resource.

/// Page number and size sent to the server for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Requested page size (advisory, the server may cap it)
    pub page_size: u32,
}

/// Continuation signal reported by a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Explicit "more pages follow" flag
    HasNextPage(bool),
    /// Total number of pages for the query
    TotalPages(u32),
}

/// Result of checking a stop signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Continue pagination
    Continue,
    /// Stop pagination
    Stop,
}

impl StopResult {
    /// Check if we should continue
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Tracks progress through one sweep
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Last page requested (0 before the first request)
    pub page: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next page; `None` once the counter is exhausted
    pub fn next_page(&mut self) -> Option<u32> {
        self.page = self.page.checked_add(1)?;
        Some(self.page)
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// One response unit of a paged listing
pub trait Page {
    /// Record type carried by the page
    type Record;

    /// Continuation signal from this response
    fn stop_signal(&self) -> StopSignal;

    /// Move the records out, leaving the page metadata in place
    fn take_records(&mut self) -> Vec<Self::Record>;
}

/// Check a stop signal against the page just fetched
pub fn check_stop_condition(signal: StopSignal, state: &PaginationState) -> StopResult {
    match signal {
        StopSignal::HasNextPage(true) => StopResult::Continue,
        StopSignal::HasNextPage(false) => StopResult::Stop,
        StopSignal::TotalPages(total) => {
            if state.page >= total {
                StopResult::Stop
            } else {
                StopResult::Continue
            }
        }
    }
}
