//! Service layer adapter for the TUI
//!
//! Bridges the async `CatalogService` and the synchronous event loop.
//!
//! # Architecture
//!
//! - `ServiceHandle`: owns the `CatalogService` and a tokio runtime
//! - Commands queued by the reducer are executed here; network work is
//!   spawned on the runtime and its result comes back as a [`ServiceEvent`]
//!   on a crossbeam channel the event loop drains without blocking
//! - The shared catalog is read with `snapshot()` after each loop iteration
//!
//! # Example
//!
//! ```no_run
//! use libbookshelf::{Config, SortDirection};
//! use shelf_tui::app::Command;
//! use shelf_tui::services::ServiceHandle;
//!
//! # fn example() -> shelf_tui::error::Result<()> {
//! let services = ServiceHandle::new(&Config::load()?)?;
//! let events = services.events();
//!
//! services.execute(Command::Search {
//!     query: "dune".to_string(),
//!     direction: SortDirection::Asc,
//!     force: false,
//! });
//!
//! // In the event loop
//! while let Ok(event) = events.try_recv() {
//!     // reduce(state, event.into())
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use libbookshelf::error::ServiceError;
use libbookshelf::service::{CatalogService, SearchOutcome, SubmitOutcome};
use libbookshelf::state::CatalogSnapshot;
use libbookshelf::{BookDraft, CatalogState, Config, SortDirection};

use crate::app::{Action, Command, SaveResult};
use crate::error::{Result, TuiError};

/// Result of background work, delivered to the event loop
#[derive(Debug, Clone)]
pub enum ServiceEvent {
    SearchFinished(std::result::Result<SearchOutcome, String>),
    SaveFinished(SaveResult),
}

impl From<ServiceEvent> for Action {
    fn from(event: ServiceEvent) -> Self {
        match event {
            ServiceEvent::SearchFinished(outcome) => Action::SearchFinished(outcome),
            ServiceEvent::SaveFinished(result) => Action::SaveFinished(result),
        }
    }
}

/// Service handle for TUI operations
pub struct ServiceHandle {
    service: Arc<CatalogService>,
    runtime: tokio::runtime::Runtime,
    event_tx: Sender<ServiceEvent>,
    event_rx: Receiver<ServiceEvent>,
}

impl ServiceHandle {
    /// Create the catalog state and an HTTP-backed service from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configured TTL, URL or timeout is invalid
    /// - Tokio runtime cannot be created
    pub fn new(config: &Config) -> Result<Self> {
        let state = CatalogState::shared(config.cache_ttl()?);
        let service = CatalogService::new(config, state)?;
        Self::with_service(service)
    }

    /// Wrap an already built service
    pub fn with_service(service: CatalogService) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new().map_err(|e| TuiError::Runtime(e.to_string()))?;
        let (event_tx, event_rx) = unbounded();

        Ok(Self {
            service: Arc::new(service),
            runtime,
            event_tx,
            event_rx,
        })
    }

    /// Receiver for results of spawned work
    pub fn events(&self) -> Receiver<ServiceEvent> {
        self.event_rx.clone()
    }

    /// Copy of the shared catalog
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.service.snapshot()
    }

    pub fn backend_name(&self) -> &str {
        self.service.backend_name()
    }

    /// Run a command queued by the reducer
    ///
    /// Form open/close is applied to the shared catalog immediately; searches
    /// and saves are spawned and report back through [`Self::events`].
    pub fn execute(&self, command: Command) {
        match command {
            Command::Search {
                query,
                direction,
                force,
            } => self.search(query, direction, force),
            Command::OpenForm(book) => self.service.open_form(book),
            Command::CloseForm => self.service.close_form(),
            Command::Save(draft) => self.save(draft),
        }
    }

    fn search(&self, query: String, direction: SortDirection, force: bool) {
        let service = Arc::clone(&self.service);
        let tx = self.event_tx.clone();

        self.runtime.spawn(async move {
            let outcome = service
                .search()
                .search(&query, direction, force)
                .await
                .map_err(|e| e.to_string());
            // Receiver dropped means the UI is shutting down
            let _ = tx.send(ServiceEvent::SearchFinished(outcome));
        });
    }

    fn save(&self, draft: BookDraft) {
        let service = Arc::clone(&self.service);
        let tx = self.event_tx.clone();
        let title = draft.title.trim().to_string();

        self.runtime.spawn(async move {
            let result = match service.editor().submit(draft).await {
                Ok(SubmitOutcome::Updated { book, .. }) => SaveResult::Updated { title: book.title },
                Ok(SubmitOutcome::Created { book, refresh }) => SaveResult::Created {
                    title: book.map(|b| b.title).unwrap_or(title),
                    refresh_error: refresh.err().map(|e: ServiceError| e.to_string()),
                },
                Err(e) => SaveResult::Failed {
                    error: e.to_string(),
                },
            };
            let _ = tx.send(ServiceEvent::SaveFinished(result));
        });
    }
}
