//! HTTP implementation of the book service

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use crate::client::BookService;
use crate::config::Config;
use crate::error::{ConfigError, Result, ServiceError};
use crate::types::{Book, SortDirection};

/// REST client for the remote book service
#[derive(Debug, Clone)]
pub struct HttpBookService {
    client: Client,
    base_url: String,
}

impl HttpBookService {
    /// Create a client for `base_url` with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not parse or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        reqwest::Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "api.timeout".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api.base_url, config.api_timeout()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn books_url(&self) -> String {
        format!("{}/books", self.base_url)
    }

    fn book_url(&self, id: i64) -> String {
        format!("{}/books/{}", self.base_url, id)
    }
}

/// Turn a non-success status into `ServiceError::Status`, otherwise return
/// the body text
async fn read_body(response: Response) -> std::result::Result<String, ServiceError> {
    let status = response.status();
    let body = response.text().await.map_err(ServiceError::from)?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn network_error(err: reqwest::Error) -> ServiceError {
    ServiceError::Network(err.to_string())
}

/// Extract the book list from a `{ "data": [...] }` body
pub fn parse_list_body(body: &str) -> std::result::Result<Vec<Book>, ServiceError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ServiceError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    match value.get("data") {
        Some(data @ Value::Array(_)) => serde_json::from_value(data.clone())
            .map_err(|e| ServiceError::MalformedResponse(format!("invalid book in data: {}", e))),
        Some(Value::Null) | None => Err(ServiceError::MalformedResponse(
            "response has no data field".to_string(),
        )),
        Some(other) => Err(ServiceError::MalformedResponse(format!(
            "data is not a list: {}",
            other
        ))),
    }
}

/// Extract a single book from a create/update response
///
/// Accepts the book itself or a `{ "data": {...} }` envelope. Anything else
/// yields `None`.
pub fn parse_book_body(body: &str) -> Option<Book> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidate = match value.get("data") {
        Some(inner @ Value::Object(_)) => inner.clone(),
        _ => value,
    };
    if candidate.is_object() {
        serde_json::from_value(candidate).ok()
    } else {
        None
    }
}

#[async_trait]
impl BookService for HttpBookService {
    async fn list(&self, query: &str, direction: SortDirection) -> std::result::Result<Vec<Book>, ServiceError> {
        let url = self.books_url();
        tracing::debug!(%url, query, direction = %direction, "GET books");

        let response = self
            .client
            .get(&url)
            .query(&[("title", query), ("DIR", direction.as_str())])
            .send()
            .await
            .map_err(network_error)?;

        let body = read_body(response).await?;
        parse_list_body(&body)
    }

    async fn create(&self, book: &Book) -> std::result::Result<Option<Book>, ServiceError> {
        let url = self.books_url();
        tracing::debug!(%url, title = %book.title, "POST book");

        let response = self
            .client
            .post(&url)
            .json(book)
            .send()
            .await
            .map_err(network_error)?;

        let body = read_body(response).await?;
        Ok(parse_book_body(&body))
    }

    async fn update(&self, id: i64, book: &Book) -> std::result::Result<Option<Book>, ServiceError> {
        let url = self.book_url(id);
        tracing::debug!(%url, "PUT book");

        let response = self
            .client
            .put(&url)
            .json(book)
            .send()
            .await
            .map_err(network_error)?;

        let body = read_body(response).await?;
        Ok(parse_book_body(&body))
    }

    fn name(&self) -> &str {
        "http"
    }
}
