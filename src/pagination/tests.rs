//! Tests for pagination module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use std::cell::RefCell;

#[derive(Debug, Clone)]
struct FakePage {
    items: Vec<&'static str>,
    signal: StopSignal,
}

impl Page for FakePage {
    type Record = &'static str;

    fn stop_signal(&self) -> StopSignal {
        self.signal
    }

    fn take_records(&mut self) -> Vec<Self::Record> {
        std::mem::take(&mut self.items)
    }
}

fn flag_page(items: Vec<&'static str>, has_next: bool) -> FakePage {
    FakePage {
        items,
        signal: StopSignal::HasNextPage(has_next),
    }
}

fn total_page(items: Vec<&'static str>, total: u32) -> FakePage {
    FakePage {
        items,
        signal: StopSignal::TotalPages(total),
    }
}

// ============================================================================
// Stop Condition Tests
// ============================================================================

#[test]
fn test_stop_condition_has_next_page() {
    let state = PaginationState { page: 3, ..Default::default() };
    assert_eq!(
        check_stop_condition(StopSignal::HasNextPage(true), &state),
        StopResult::Continue
    );
    assert_eq!(
        check_stop_condition(StopSignal::HasNextPage(false), &state),
        StopResult::Stop
    );
}

#[test]
fn test_stop_condition_total_pages() {
    let mut state = PaginationState::new();
    state.page = 3;
    assert!(check_stop_condition(StopSignal::TotalPages(5), &state).should_continue());

    state.page = 5;
    assert!(check_stop_condition(StopSignal::TotalPages(5), &state).should_stop());

    // A server reporting zero pages still gets one request
    state.page = 1;
    assert!(check_stop_condition(StopSignal::TotalPages(0), &state).should_stop());
}

#[test]
fn test_pagination_state_mutations() {
    let mut state = PaginationState::new();
    assert_eq!(state.page, 0);

    assert_eq!(state.next_page(), Some(1));
    state.add_fetched(100);
    assert_eq!(state.page, 1);
    assert_eq!(state.total_fetched, 100);
}

#[test]
fn test_pagination_state_stops_at_last_page_number() {
    let mut state = PaginationState::new();
    state.page = u32::MAX - 1;

    assert_eq!(state.next_page(), Some(u32::MAX));
    assert_eq!(state.next_page(), None);
    assert_eq!(state.page, u32::MAX);
}

// ============================================================================
// Aggregator Tests
// ============================================================================

#[tokio::test]
async fn test_collect_all_follows_has_next_flag() {
    let pages = vec![
        flag_page(vec!["a", "b"], true),
        flag_page(vec!["c"], true),
        flag_page(vec!["d", "e"], false),
    ];
    let requests = RefCell::new(Vec::new());

    let collection = Paginator::new(100)
        .collect_all(|req| {
            requests.borrow_mut().push(req);
            let page = pages[(req.page - 1) as usize].clone();
            async move { Ok::<_, Error>(page) }
        })
        .await
        .unwrap();

    assert_eq!(collection.records, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(collection.pages_fetched, 3);
    assert!(collection.last_page.items.is_empty());
    assert_eq!(
        requests.into_inner(),
        vec![
            PageRequest { page: 1, page_size: 100 },
            PageRequest { page: 2, page_size: 100 },
            PageRequest { page: 3, page_size: 100 },
        ]
    );
}

#[tokio::test]
async fn test_collect_all_total_pages_ignores_record_counts() {
    // Short and empty pages do not end the sweep early
    let pages = vec![
        total_page(vec!["a"], 4),
        total_page(vec![], 4),
        total_page(vec!["b"], 4),
        total_page(vec![], 4),
    ];
    let calls = RefCell::new(0u32);

    let collection = Paginator::new(100)
        .collect_all(|req| {
            *calls.borrow_mut() += 1;
            let page = pages[(req.page - 1) as usize].clone();
            async move { Ok::<_, Error>(page) }
        })
        .await
        .unwrap();

    assert_eq!(*calls.borrow(), 4);
    assert_eq!(collection.records, vec!["a", "b"]);
}

#[tokio::test]
async fn test_collect_all_reads_total_from_latest_page() {
    // The total grows between calls; the latest response wins
    let pages = vec![total_page(vec!["a"], 1), total_page(vec!["b"], 2)];
    let first = RefCell::new(true);

    let collection = Paginator::new(10)
        .collect_all(|_| {
            let idx = usize::from(*first.borrow());
            *first.borrow_mut() = false;
            let page = pages[idx].clone();
            async move { Ok::<_, Error>(page) }
        })
        .await
        .unwrap();

    assert_eq!(collection.pages_fetched, 2);
    assert_eq!(collection.records, vec!["b", "a"]);
}

#[tokio::test]
async fn test_collect_all_keeps_duplicates() {
    let pages = vec![
        flag_page(vec!["alice", "bob"], true),
        flag_page(vec!["bob", "carol"], false),
    ];

    let collection = Paginator::new(2)
        .collect_all(|req| {
            let page = pages[(req.page - 1) as usize].clone();
            async move { Ok::<_, Error>(page) }
        })
        .await
        .unwrap();

    assert_eq!(collection.records, vec!["alice", "bob", "bob", "carol"]);
}

#[tokio::test]
async fn test_collect_all_failure_discards_partial_results() {
    let calls = RefCell::new(0u32);

    let result = Paginator::new(100)
        .collect_all(|req| {
            *calls.borrow_mut() += 1;
            let outcome = if req.page < 3 {
                Ok(flag_page(vec!["x"], true))
            } else {
                Err(Error::http_status(500, "boom"))
            };
            async move { outcome }
        })
        .await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
    assert_eq!(*calls.borrow(), 3);
}

#[tokio::test]
async fn test_collect_all_page_budget() {
    let calls = RefCell::new(0u32);

    let result = Paginator::new(100)
        .with_max_pages(Some(5))
        .collect_all(|_| {
            *calls.borrow_mut() += 1;
            async { Ok::<_, Error>(flag_page(vec!["loop"], true)) }
        })
        .await;

    assert!(matches!(result, Err(Error::PageBudgetExceeded { pages: 5 })));
    assert_eq!(*calls.borrow(), 5);
}

#[tokio::test]
async fn test_collect_all_single_page() {
    let collection = Paginator::new(100)
        .with_max_pages(Some(1))
        .collect_all(|_| async { Ok::<_, Error>(flag_page(vec!["only"], false)) })
        .await
        .unwrap();

    assert_eq!(collection.records, vec!["only"]);
    assert_eq!(collection.pages_fetched, 1);
}
