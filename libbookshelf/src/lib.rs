//! Bookshelf - a book catalog client
//!
//! This library provides the core of the Bookshelf catalog: the data model,
//! a time-bounded cache of search results, the state container that keeps the
//! current results and every cached snapshot coherent, and the services that
//! decide between cache and the remote book service.

pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod service;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheStore};
pub use config::Config;
pub use error::{BookshelfError, Result};
pub use pagination::Pagination;
pub use state::{CatalogState, SharedCatalog};
pub use types::{Book, BookDraft, QueryKey, SortDirection};
