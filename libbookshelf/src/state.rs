//! Catalog state container
//!
//! `CatalogState` is the single source of truth for the current search
//! results, the result cache and the add/edit form selection. It is created
//! once by the application root and shared with the services as a
//! [`SharedCatalog`]; every field is private and changes only through the
//! transitions below.
//!
//! The current results and each cache entry are independent copies of a
//! book list. Edits and inserts go through [`propagate`] so that every copy
//! that can be shown again sees the change.

use chrono::{DateTime, Utc};
use std::iter;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cache::{CacheStore, DEFAULT_TTL};
use crate::types::{Book, QueryKey};

/// State handle shared between the application root and the services
///
/// Lock it only for the duration of a transition, never across an `.await`.
pub type SharedCatalog = Arc<Mutex<CatalogState>>;

/// Generation number of a search request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A change to one book that must reach every copy of the result list
#[derive(Debug, Clone, PartialEq)]
pub enum BookChange {
    /// Replace the book with the same id, keeping its position
    Replace(Book),
    /// Insert a new book at the front
    Prepend(Book),
}

/// Result of propagating a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Number of sequences that were modified
    Applied(usize),
    /// No sequence held the book; nothing changed
    NotFound,
}

impl Propagation {
    pub fn touched(&self) -> usize {
        match self {
            Propagation::Applied(n) => *n,
            Propagation::NotFound => 0,
        }
    }
}

/// Apply `change` to every sequence in `sequences`
///
/// `Replace` only touches sequences that contain a book with the same id and
/// leaves the order alone; a book without an id never matches. `Prepend`
/// touches every sequence.
pub fn propagate<'a, I>(change: &BookChange, sequences: I) -> Propagation
where
    I: IntoIterator<Item = &'a mut Vec<Book>>,
{
    let mut touched = 0;
    for books in sequences {
        match change {
            BookChange::Replace(updated) => {
                if let Some(slot) = books.iter_mut().find(|b| b.same_id(updated)) {
                    *slot = updated.clone();
                    touched += 1;
                }
            }
            BookChange::Prepend(new_book) => {
                books.insert(0, new_book.clone());
                touched += 1;
            }
        }
    }

    if touched == 0 {
        Propagation::NotFound
    } else {
        Propagation::Applied(touched)
    }
}

#[derive(Debug, Clone)]
pub struct CatalogState {
    results: Vec<Book>,
    cache: CacheStore,
    is_form_open: bool,
    selected_book: Option<Book>,
    is_loading: bool,
    last_updated: Option<DateTime<Utc>>,
    latest_request: u64,
}

/// Read-only copy of the parts of the state a view renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub results: Vec<Book>,
    pub is_form_open: bool,
    pub selected_book: Option<Book>,
    pub is_loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub cached_queries: usize,
}

impl CatalogState {
    pub fn new(ttl: Duration) -> Self {
        Self {
            results: Vec::new(),
            cache: CacheStore::new(ttl),
            is_form_open: false,
            selected_book: None,
            is_loading: false,
            last_updated: None,
            latest_request: 0,
        }
    }

    /// Wrap a fresh state in the shared handle
    pub fn shared(ttl: Duration) -> SharedCatalog {
        Arc::new(Mutex::new(Self::new(ttl)))
    }

    pub fn results(&self) -> &[Book] {
        &self.results
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn is_form_open(&self) -> bool {
        self.is_form_open
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.selected_book.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            results: self.results.clone(),
            is_form_open: self.is_form_open,
            selected_book: self.selected_book.clone(),
            is_loading: self.is_loading,
            last_updated: self.last_updated,
            cached_queries: self.cache.len(),
        }
    }

    // ========================================================================
    // Results and cache
    // ========================================================================

    /// Replace the results and write the same data to the cache slot for
    /// `key`, stamped with `now`
    ///
    /// This is the only way data enters the cache.
    pub fn set_results(&mut self, data: Vec<Book>, key: QueryKey, now: DateTime<Utc>) {
        self.results = data.clone();
        self.last_updated = Some(now);
        self.cache.store(key, data, now);
    }

    /// Fresh cached data for `key`, if any
    pub fn cached(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<&[Book]> {
        self.cache.get(key, now)
    }

    /// Show previously cached data without touching the cache entry
    pub fn commit_cached(&mut self, data: Vec<Book>) {
        self.results = data;
    }

    /// Replace the book with `updated.id` in the results and in every cache
    /// entry, each at its current position
    pub fn update_in_results(&mut self, updated: Book) -> Propagation {
        let sequences = iter::once(&mut self.results).chain(self.cache.sequences_mut());
        propagate(&BookChange::Replace(updated), sequences)
    }

    /// Put `new_book` first in the results and in every cache entry
    pub fn add_to_results(&mut self, new_book: Book) -> Propagation {
        let sequences = iter::once(&mut self.results).chain(self.cache.sequences_mut());
        propagate(&BookChange::Prepend(new_book), sequences)
    }

    /// Drop every cache entry and forget when results were last fetched
    ///
    /// The current results stay on screen.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.last_updated = None;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    // ========================================================================
    // Form selection
    // ========================================================================

    /// Open the form; `None` means create mode
    pub fn open_form(&mut self, book: Option<Book>) {
        self.is_form_open = true;
        self.selected_book = book;
    }

    pub fn close_form(&mut self) {
        self.is_form_open = false;
        self.selected_book = None;
    }

    // ========================================================================
    // Request fencing
    // ========================================================================

    /// Issue the next request token; every earlier token becomes stale
    pub fn begin_request(&mut self) -> RequestToken {
        self.latest_request += 1;
        RequestToken(self.latest_request)
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest_request
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
