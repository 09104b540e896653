//! Mock book service for testing
//!
//! This module provides an in-memory book service that behaves like the
//! remote API (title filtering, sorting, id assignment) and can be told to
//! fail or to answer slowly. Clones share the same catalog and counters, so a
//! test can keep one handle for assertions while the services own another.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::client::BookService;
use crate::error::ServiceError;
use crate::types::{Book, SortDirection};

#[derive(Debug, Default)]
struct MockInner {
    catalog: Vec<Book>,
    next_id: i64,
    list_error: Option<ServiceError>,
    write_error: Option<ServiceError>,
    list_delays: VecDeque<Duration>,
    list_calls: Vec<(String, SortDirection)>,
    created: Vec<Book>,
    updated: Vec<(i64, Book)>,
}

/// In-memory book service
#[derive(Debug, Clone, Default)]
pub struct MockBookService {
    inner: Arc<Mutex<MockInner>>,
}

impl MockBookService {
    /// Empty catalog; ids start at 1
    pub fn new() -> Self {
        Self::with_books(Vec::new())
    }

    /// Catalog preloaded with `books`; new ids continue after the highest one
    pub fn with_books(books: Vec<Book>) -> Self {
        let next_id = books.iter().filter_map(|b| b.id).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                catalog: books,
                next_id,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every `list` call fail with `error` until cleared
    pub fn fail_list(&self, error: ServiceError) {
        self.lock().list_error = Some(error);
    }

    /// Make every `create`/`update` call fail with `error` until cleared
    pub fn fail_writes(&self, error: ServiceError) {
        self.lock().write_error = Some(error);
    }

    pub fn clear_failures(&self) {
        let mut inner = self.lock();
        inner.list_error = None;
        inner.write_error = None;
    }

    /// Delay the next `list` call by `delay`; queued delays apply in order
    pub fn queue_list_delay(&self, delay: Duration) {
        self.lock().list_delays.push_back(delay);
    }

    /// Change a book in the backing catalog without going through `update`
    pub fn replace_in_catalog(&self, book: Book) {
        let mut inner = self.lock();
        if let Some(slot) = inner.catalog.iter_mut().find(|b| b.same_id(&book)) {
            *slot = book;
        }
    }

    pub fn list_call_count(&self) -> usize {
        self.lock().list_calls.len()
    }

    /// Every `(query, direction)` passed to `list`, in call order
    pub fn list_calls(&self) -> Vec<(String, SortDirection)> {
        self.lock().list_calls.clone()
    }

    /// Bodies received by `create`
    pub fn created(&self) -> Vec<Book> {
        self.lock().created.clone()
    }

    /// `(id, body)` pairs received by `update`
    pub fn updated(&self) -> Vec<(i64, Book)> {
        self.lock().updated.clone()
    }

    pub fn catalog(&self) -> Vec<Book> {
        self.lock().catalog.clone()
    }
}

#[async_trait]
impl BookService for MockBookService {
    async fn list(&self, query: &str, direction: SortDirection) -> Result<Vec<Book>, ServiceError> {
        let delay = {
            let mut inner = self.lock();
            inner.list_calls.push((query.to_string(), direction));
            inner.list_delays.pop_front()
        };

        if let Some(delay) = delay {
            sleep(delay).await;
        }

        let inner = self.lock();
        if let Some(ref error) = inner.list_error {
            return Err(error.clone());
        }

        let needle = query.to_lowercase();
        let mut books: Vec<Book> = inner
            .catalog
            .iter()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        if direction == SortDirection::Desc {
            books.reverse();
        }
        Ok(books)
    }

    async fn create(&self, book: &Book) -> Result<Option<Book>, ServiceError> {
        let mut inner = self.lock();
        inner.created.push(book.clone());
        if let Some(ref error) = inner.write_error {
            return Err(error.clone());
        }

        let created = Book {
            id: Some(inner.next_id),
            ..book.clone()
        };
        inner.next_id += 1;
        inner.catalog.push(created.clone());
        Ok(Some(created))
    }

    async fn update(&self, id: i64, book: &Book) -> Result<Option<Book>, ServiceError> {
        let mut inner = self.lock();
        inner.updated.push((id, book.clone()));
        if let Some(ref error) = inner.write_error {
            return Err(error.clone());
        }

        let updated = Book {
            id: Some(id),
            ..book.clone()
        };
        match inner.catalog.iter_mut().find(|b| b.id == Some(id)) {
            Some(slot) => {
                *slot = updated.clone();
                Ok(Some(updated))
            }
            None => Err(ServiceError::Status {
                status: 404,
                body: format!("book {} not found", id),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str) -> Book {
        Book {
            id: Some(id),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let mock = MockBookService::with_books(vec![
            book(1, "Dune"),
            book(2, "Dune Messiah"),
            book(3, "Emma"),
        ]);

        let asc = mock.list("dune", SortDirection::Asc).await.unwrap();
        assert_eq!(asc.iter().map(|b| b.id.unwrap()).collect::<Vec<_>>(), vec![1, 2]);

        let desc = mock.list("", SortDirection::Desc).await.unwrap();
        assert_eq!(desc[0].title, "Emma");
        assert_eq!(mock.list_call_count(), 2);
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let mock = MockBookService::with_books(vec![book(7, "Dune")]);
        let created = mock
            .create(&Book { title: "Emma".to_string(), ..Default::default() })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(created.id, Some(8));
        assert_eq!(mock.catalog().len(), 2);
        assert_eq!(mock.created()[0].id, None);
    }

    #[tokio::test]
    async fn test_update_unknown_is_404() {
        let mock = MockBookService::new();
        let err = mock.update(4, &book(4, "Ghost")).await.unwrap_err();
        assert_eq!(err, ServiceError::Status { status: 404, body: "book 4 not found".to_string() });
    }

    #[tokio::test]
    async fn test_failures_can_be_cleared() {
        let mock = MockBookService::new();
        mock.fail_list(ServiceError::Network("refused".to_string()));
        assert!(mock.list("", SortDirection::Asc).await.is_err());

        mock.clear_failures();
        assert!(mock.list("", SortDirection::Asc).await.is_ok());
    }
}
