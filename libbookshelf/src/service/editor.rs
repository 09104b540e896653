//! Add/edit form submission

use std::sync::Arc;

use crate::client::BookService;
use crate::error::{Result, ServiceError};
use crate::service::lock;
use crate::service::search::{SearchOutcome, SearchService};
use crate::state::{Propagation, SharedCatalog};
use crate::types::{Book, BookDraft};

/// What a successful submission did
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// An existing book was replaced on the service and in every local copy
    Updated { book: Book, propagation: Propagation },
    /// A new book was created and the current search was fetched again so the
    /// service-assigned id shows up
    Created {
        book: Option<Book>,
        refresh: std::result::Result<SearchOutcome, ServiceError>,
    },
}

#[derive(Clone)]
pub struct EditorService {
    backend: Arc<dyn BookService>,
    state: SharedCatalog,
    search: SearchService,
}

impl EditorService {
    pub fn new(backend: Arc<dyn BookService>, state: SharedCatalog, search: SearchService) -> Self {
        Self {
            backend,
            state,
            search,
        }
    }

    /// Validate and send a draft, then close the form
    ///
    /// Drafts with an id are updates: the submitted book replaces the old one
    /// wherever it is held locally. Drafts without an id are creates: the
    /// last search is re-fetched with the cache bypassed instead of inserting
    /// locally, so the list carries the id the service assigned.
    ///
    /// # Errors
    ///
    /// - `BookshelfError::InvalidInput` if the draft fails validation; no
    ///   request is made
    /// - `BookshelfError::Service` if the create/update request fails
    ///
    /// The form stays open on error.
    pub async fn submit(&self, draft: BookDraft) -> Result<SubmitOutcome> {
        let book = draft.into_submission()?;

        let outcome = match book.id {
            Some(id) => {
                tracing::info!(id, title = %book.title, "Updating book");
                self.backend.update(id, &book).await.map_err(|e| {
                    tracing::error!(id, error = %e, "Error saving book");
                    e
                })?;

                let propagation = lock(&self.state).update_in_results(book.clone());
                if propagation == Propagation::NotFound {
                    tracing::debug!(id, "Updated book is not held locally");
                }
                SubmitOutcome::Updated { book, propagation }
            }
            None => {
                tracing::info!(title = %book.title, "Creating book");
                let created = self.backend.create(&book).await.map_err(|e| {
                    tracing::error!(error = %e, "Error saving book");
                    e
                })?;

                let refresh = self.search.refresh().await;
                if let Err(ref e) = refresh {
                    tracing::warn!(error = %e, "Refresh after create failed");
                }
                SubmitOutcome::Created {
                    book: created,
                    refresh,
                }
            }
        };

        lock(&self.state).close_form();
        Ok(outcome)
    }
}
