//! Service layer for Bookshelf
//!
//! This module provides the operations a front end needs, independent of how
//! it renders: searching with the result cache, and saving books through the
//! add/edit form.
//!
//! # Architecture
//!
//! `CatalogService` is the entry point. It owns nothing global: the
//! application root creates the [`SharedCatalog`] and hands it in, and the
//! facade shares it with two sub-services:
//!
//! - `SearchService`: decides between cache and remote fetch and reconciles
//!   the answer into the state container
//! - `EditorService`: create/update through the remote service, then keeps
//!   the local copies coherent
//!
//! # Example
//!
//! ```no_run
//! use libbookshelf::service::CatalogService;
//! use libbookshelf::{CatalogState, Config, SortDirection};
//!
//! # async fn example() -> libbookshelf::Result<()> {
//! let config = Config::load()?;
//! let state = CatalogState::shared(config.cache_ttl()?);
//! let service = CatalogService::new(&config, state)?;
//!
//! let outcome = service.search().search("dune", SortDirection::Asc, false).await?;
//! println!("{:?}, {} books", outcome, service.snapshot().results.len());
//! # Ok(())
//! # }
//! ```

pub mod editor;
pub mod search;

pub use editor::{EditorService, SubmitOutcome};
pub use search::{SearchOutcome, SearchService};

use std::sync::{Arc, MutexGuard};

use crate::client::http::HttpBookService;
use crate::client::BookService;
use crate::clock::{Clock, SystemClock};
use crate::state::{CatalogSnapshot, CatalogState, SharedCatalog};
use crate::types::Book;
use crate::{Config, Result};

/// Lock the shared state, recovering from a poisoned lock
///
/// Transitions never leave the state half-written, so a panic elsewhere does
/// not invalidate it.
pub(crate) fn lock(state: &SharedCatalog) -> MutexGuard<'_, CatalogState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Main service facade that coordinates the sub-services
pub struct CatalogService {
    state: SharedCatalog,
    backend: Arc<dyn BookService>,
    search: SearchService,
    editor: EditorService,
}

impl CatalogService {
    /// Create a service talking HTTP to the configured book service
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL or timeout in `config` is invalid.
    pub fn new(config: &Config, state: SharedCatalog) -> Result<Self> {
        let backend = HttpBookService::from_config(config)?;
        Ok(Self::with_backend(
            Arc::new(backend),
            state,
            Arc::new(SystemClock),
        ))
    }

    /// Create a service over any backend and clock
    ///
    /// Used by tests with `MockBookService` and `ManualClock`.
    pub fn with_backend(
        backend: Arc<dyn BookService>,
        state: SharedCatalog,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let search = SearchService::new(Arc::clone(&backend), Arc::clone(&state), clock);
        let editor = EditorService::new(Arc::clone(&backend), Arc::clone(&state), search.clone());

        tracing::debug!(backend = backend.name(), "Catalog service ready");

        Self {
            state,
            backend,
            search,
            editor,
        }
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn editor(&self) -> &EditorService {
        &self.editor
    }

    pub fn state(&self) -> &SharedCatalog {
        &self.state
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Copy of the view-facing state
    pub fn snapshot(&self) -> CatalogSnapshot {
        lock(&self.state).snapshot()
    }

    /// Open the add/edit form; `None` opens it in create mode
    pub fn open_form(&self, book: Option<Book>) {
        lock(&self.state).open_form(book);
    }

    pub fn close_form(&self) {
        lock(&self.state).close_form();
    }

    /// Drop every cached search; the next search of any query fetches
    pub fn clear_cache(&self) {
        lock(&self.state).clear_cache();
        tracing::info!("Search cache cleared");
    }
}
