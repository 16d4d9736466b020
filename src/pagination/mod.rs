//! Pagination module
//!
//! Turns a page-at-a-time listing into one fully materialized collection.
//!
//! # Overview
//!
//! Every paged resource is driven through the same primitive: request page
//! 1, 2, 3, ... with a fixed page size, concatenate the records in fetch
//! order and stop when the most recent response says so. The stop signal is
//! either a "has next page" flag or a total page count, always read from the
//! server and never computed client-side.

mod aggregator;
mod types;

pub use aggregator::{PaginatedCollection, Paginator};
pub use types::{
    check_stop_condition, Page, PageRequest, PaginationState, StopResult, StopSignal,
};

#[cfg(test)]
mod tests;
