//! Search orchestration
//!
//! A search first checks the cache (unless forced), and only on a miss asks
//! the remote service. Whatever the service answers, including an error, is
//! written back through `set_results`, so an empty or failed query is cached
//! as empty for the rest of its TTL.
//!
//! Each search takes a request token. A response that arrives after a newer
//! search started is dropped without touching the state.

use std::sync::{Arc, Mutex};

use crate::client::BookService;
use crate::clock::Clock;
use crate::error::ServiceError;
use crate::service::lock;
use crate::state::SharedCatalog;
use crate::types::{QueryKey, SortDirection};

/// How a search finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Served from a fresh cache entry; no request was made
    CacheHit { count: usize },
    /// Fetched from the service and cached
    Fetched { count: usize },
    /// The service answered without a usable book list; cached as empty
    Empty,
    /// A newer search started before this one finished; nothing changed
    Superseded,
}

impl SearchOutcome {
    /// Whether the caller should go back to the first page
    pub fn resets_pagination(&self) -> bool {
        matches!(self, SearchOutcome::Fetched { .. } | SearchOutcome::Empty)
    }
}

#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn BookService>,
    state: SharedCatalog,
    clock: Arc<dyn Clock>,
    last_query: Arc<Mutex<QueryKey>>,
}

impl SearchService {
    pub fn new(backend: Arc<dyn BookService>, state: SharedCatalog, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            state,
            clock,
            last_query: Arc::new(Mutex::new(QueryKey::new("", SortDirection::default()))),
        }
    }

    /// The most recently requested query and direction
    pub fn last_query(&self) -> QueryKey {
        self.last_query
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn remember(&self, key: &QueryKey) {
        *self.last_query.lock().unwrap_or_else(|e| e.into_inner()) = key.clone();
    }

    /// Run a search
    ///
    /// With `force_refresh` the cache is skipped and the service is always
    /// asked.
    ///
    /// # Errors
    ///
    /// Returns the service error on network or HTTP failure. The state has
    /// already been updated to an empty result by then, so callers only need
    /// the error for notification.
    pub async fn search(
        &self,
        query: &str,
        direction: SortDirection,
        force_refresh: bool,
    ) -> Result<SearchOutcome, ServiceError> {
        let key = QueryKey::new(query, direction);
        self.remember(&key);

        let token = {
            let mut state = lock(&self.state);
            let token = state.begin_request();

            if !force_refresh {
                let now = self.clock.now();
                if let Some(cached) = state.cached(&key, now).map(|books| books.to_vec()) {
                    let count = cached.len();
                    state.commit_cached(cached);
                    state.set_loading(false);
                    tracing::debug!(key = %key, count, "Using cached results");
                    return Ok(SearchOutcome::CacheHit { count });
                }
                tracing::debug!(key = %key, "Cache miss");
            }

            state.set_loading(true);
            token
        };

        tracing::info!(key = %key, force_refresh, request = token.value(), "Fetching fresh data");
        let response = self.backend.list(query, direction).await;

        let mut state = lock(&self.state);
        if !state.is_latest(token) {
            tracing::debug!(key = %key, request = token.value(), "Discarding superseded response");
            return Ok(SearchOutcome::Superseded);
        }

        let now = self.clock.now();
        let outcome = match response {
            Ok(books) => {
                let count = books.len();
                state.set_results(books, key, now);
                tracing::info!(count, "Search results updated");
                Ok(SearchOutcome::Fetched { count })
            }
            Err(e) if e.is_malformed() => {
                tracing::warn!(key = %key, error = %e, "Book service sent no usable data, treating as empty");
                state.set_results(Vec::new(), key, now);
                Ok(SearchOutcome::Empty)
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Error searching books");
                state.set_results(Vec::new(), key, now);
                Err(e)
            }
        };
        state.set_loading(false);
        outcome
    }

    /// Forced search of the last requested query
    pub async fn refresh(&self) -> Result<SearchOutcome, ServiceError> {
        let key = self.last_query();
        self.search(&key.query, key.direction, true).await
    }
}
