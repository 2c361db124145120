//! Newest-search-wins publication.

use arc_swap::ArcSwapOption;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::search::engine::{SearchReport, SearchResult};

/// Identifies one search; later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results are now on display.
    Published(Arc<SearchReport>),
    /// A newer search started meanwhile; results were discarded.
    Superseded,
}

#[derive(Debug)]
struct Displayed {
    ticket: SearchTicket,
    report: Arc<SearchReport>,
}

/// Holds the results on display and makes sure a stale search never
/// replaces those of a newer one.
#[derive(Debug, Default)]
pub struct SearchCoordinator {
    latest: AtomicU64,
    display: ArcSwapOption<Displayed>,
}

impl SearchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search, superseding every earlier one.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Display `report` if `ticket` is still the newest search.
    pub fn publish(&self, ticket: SearchTicket, report: SearchReport) -> SearchOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "Discarding superseded search");
            return SearchOutcome::Superseded;
        }

        let report = Arc::new(report);
        let mut published = false;
        self.display.rcu(|shown| match shown {
            Some(shown) if shown.ticket > ticket => {
                published = false;
                Some(Arc::clone(shown))
            }
            _ => {
                published = true;
                Some(Arc::new(Displayed {
                    ticket,
                    report: Arc::clone(&report),
                }))
            }
        });

        if published {
            SearchOutcome::Published(report)
        } else {
            SearchOutcome::Superseded
        }
    }

    /// Run `search` under a fresh ticket.
    ///
    /// Errors from a superseded search are swallowed along with its results.
    pub async fn run<F>(&self, search: F) -> SearchResult<SearchOutcome>
    where
        F: Future<Output = SearchResult<SearchReport>>,
    {
        let ticket = self.begin();
        let result = search.await;
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "Discarding superseded search");
            return Ok(SearchOutcome::Superseded);
        }
        Ok(self.publish(ticket, result?))
    }

    /// Results currently on display.
    pub fn displayed(&self) -> Option<Arc<SearchReport>> {
        self.display
            .load_full()
            .map(|shown| Arc::clone(&shown.report))
    }

    pub fn clear(&self) {
        self.display.store(None);
    }
}
