//! Remote book service abstraction
//!
//! The catalog talks to its backend through the [`BookService`] trait. The
//! production implementation is [`http::HttpBookService`], which speaks the
//! REST contract:
//!
//! - `GET {base}/books?title={query}&DIR={ASC|DESC}` → `{ "data": [Book] }`
//! - `POST {base}/books` with a book lacking `id` → the created book
//! - `PUT {base}/books/{id}` with the full book → the updated book
//!
//! [`mock::MockBookService`] is an in-process stand-in with call counters.
//!
//! # Examples
//!
//! ```no_run
//! use libbookshelf::client::{BookService, http::HttpBookService};
//! use libbookshelf::{Config, SortDirection};
//!
//! # async fn example() -> libbookshelf::Result<()> {
//! let service = HttpBookService::from_config(&Config::default())?;
//! let books = service.list("dune", SortDirection::Asc).await?;
//! println!("{} books", books.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{Book, SortDirection};

pub mod http;

// Mock service is available for all builds (not just tests) to support integration tests
pub mod mock;

/// Operations offered by the remote book service
#[async_trait]
pub trait BookService: Send + Sync {
    /// Search the catalog
    ///
    /// An empty query returns the default catalog.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Network` if the request could not complete
    /// - `ServiceError::Status` for a non-success HTTP status
    /// - `ServiceError::MalformedResponse` if the body has no `data` list
    async fn list(&self, query: &str, direction: SortDirection) -> Result<Vec<Book>, ServiceError>;

    /// Create a book; the service assigns its id
    ///
    /// Returns the created book when the response body contains one.
    async fn create(&self, book: &Book) -> Result<Option<Book>, ServiceError>;

    /// Replace the book with `id`
    ///
    /// Returns the updated book when the response body contains one.
    async fn update(&self, id: i64, book: &Book) -> Result<Option<Book>, ServiceError>;

    /// Short name for logs
    fn name(&self) -> &str;
}
