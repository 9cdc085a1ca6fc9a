//! On-demand catalog search.
#![allow(clippy::future_not_send)]

use std::cell::Cell;
use std::rc::Rc;

use reelview_api::catalog::{ApiError, ContentItem, LocalCatalogApi};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Published search state.
///
/// `results` always belong to the last completed query; a blank query holds
/// no results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Last query passed to [`SearchUnit::search`].
    pub query: String,
    /// Results in server order.
    pub results: Vec<ContentItem>,
    /// A search request is in flight.
    pub loading: bool,
    /// Failure of the last completed search.
    pub error: Option<ApiError>,
}

impl SearchState {
    /// Returns `true` while a non-blank query is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/// Search unit with last-query-wins ordering.
#[derive(Debug)]
pub struct SearchUnit<C> {
    api: Rc<C>,
    generation: Cell<u64>,
    state: watch::Sender<SearchState>,
}

impl<C: LocalCatalogApi> SearchUnit<C> {
    /// Creates an idle search unit.
    pub fn new(api: Rc<C>) -> Self {
        Self {
            api,
            generation: Cell::new(0),
            state: watch::Sender::new(SearchState::default()),
        }
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Runs a search.
    ///
    /// A blank query yields no results without a request. Any search still in
    /// flight when a newer one starts (or the unit is cleared) is ignored when
    /// it completes.
    pub async fn search(&self, query: &str) {
        let ticket = self.next_ticket();

        if query.trim().is_empty() {
            self.state.send_replace(SearchState {
                query: String::from(query),
                ..SearchState::default()
            });
            return;
        }

        self.state.send_modify(|state| {
            state.query = String::from(query);
            state.loading = true;
            state.error = None;
        });
        let _pending = Pending {
            unit: self,
            ticket,
        };

        let result = self.api.search(query).await;

        if self.generation.get() != ticket {
            debug!(query, ticket, "discarding stale search response");
            return;
        }
        self.state.send_modify(|state| {
            state.loading = false;
            match result {
                Ok(results) => {
                    debug!(query, count = results.len(), "search completed");
                    state.results = results;
                    state.error = None;
                }
                Err(err) => {
                    warn!(query, error = %err, "search failed");
                    state.results = Vec::new();
                    state.error = Some(err);
                }
            }
        });
    }

    /// Leaves search mode: empties the state and invalidates any search in
    /// flight.
    pub fn clear(&self) {
        self.next_ticket();
        self.state.send_replace(SearchState::default());
    }

    fn next_ticket(&self) -> u64 {
        let ticket = self.generation.get().wrapping_add(1);
        self.generation.set(ticket);
        ticket
    }
}

/// Clears `loading` if the latest search is dropped before it completes.
struct Pending<'a, C> {
    unit: &'a SearchUnit<C>,
    ticket: u64,
}

impl<C> Drop for Pending<'_, C> {
    fn drop(&mut self) {
        if self.unit.generation.get() == self.ticket {
            self.unit
                .state
                .send_if_modified(|state| std::mem::replace(&mut state.loading, false));
        }
    }
}
