//! HTTP book service against a local fake server
//!
//! Each test starts an axum app on an ephemeral port that records what it
//! received and answers the way the real book service does.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use libbookshelf::client::http::HttpBookService;
use libbookshelf::client::BookService;
use libbookshelf::error::ServiceError;
use libbookshelf::{Book, SortDirection};

#[derive(Clone, Default)]
struct Recorder {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn list_books(
    State(recorder): State<Recorder>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    recorder.queries.lock().unwrap().push(params);
    Json(json!({
        "data": [
            {"id": 1, "title": "Dune", "author": "Frank Herbert", "pages": 412, "year": "1965"},
            {"id": "2", "title": "Dune Messiah", "author": "Frank Herbert", "link": null}
        ]
    }))
}

async fn create_book(State(recorder): State<Recorder>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    recorder.bodies.lock().unwrap().push(body.clone());
    let mut created = body;
    created["id"] = json!(99);
    (StatusCode::CREATED, Json(created))
}

async fn update_book(
    State(recorder): State<Recorder>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    recorder.bodies.lock().unwrap().push(body.clone());
    if id == 404 {
        return Err((StatusCode::NOT_FOUND, "no such book".to_string()));
    }
    Ok(Json(json!({ "data": body })))
}

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

async fn catalog_server() -> (HttpBookService, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/:id", put(update_book))
        .with_state(recorder.clone());
    let base = spawn_server(app).await;
    let service = HttpBookService::new(&base, Duration::from_secs(5)).unwrap();
    (service, recorder)
}

fn draft_book() -> Book {
    Book {
        id: None,
        title: "Children of Dune".to_string(),
        author: "Frank Herbert".to_string(),
        country: "USA".to_string(),
        language: "English".to_string(),
        link: String::new(),
        pages: "444".to_string(),
        year: "1976".to_string(),
    }
}

#[tokio::test]
async fn test_list_sends_title_and_direction() {
    let (service, recorder) = catalog_server().await;

    let books = service.list("dune", SortDirection::Desc).await.unwrap();

    assert_eq!(books.len(), 2);
    assert_eq!(books[0].pages, "412");
    assert_eq!(books[1].id, Some(2));
    assert_eq!(books[1].link, "");

    let queries = recorder.queries.lock().unwrap();
    assert_eq!(queries[0].get("title").map(String::as_str), Some("dune"));
    assert_eq!(queries[0].get("DIR").map(String::as_str), Some("DESC"));
}

#[tokio::test]
async fn test_list_with_empty_query_still_sends_title() {
    let (service, recorder) = catalog_server().await;

    service.list("", SortDirection::Asc).await.unwrap();

    let queries = recorder.queries.lock().unwrap();
    assert_eq!(queries[0].get("title").map(String::as_str), Some(""));
    assert_eq!(queries[0].get("DIR").map(String::as_str), Some("ASC"));
}

#[tokio::test]
async fn test_create_posts_book_without_id() {
    let (service, recorder) = catalog_server().await;

    let created = service.create(&draft_book()).await.unwrap().unwrap();

    assert_eq!(created.id, Some(99));
    assert_eq!(created.title, "Children of Dune");
    let bodies = recorder.bodies.lock().unwrap();
    assert!(bodies[0].get("id").is_none());
    assert_eq!(bodies[0]["pages"], "444");
}

#[tokio::test]
async fn test_update_puts_full_book() {
    let (service, recorder) = catalog_server().await;
    let book = Book {
        id: Some(7),
        ..draft_book()
    };

    let updated = service.update(7, &book).await.unwrap().unwrap();

    assert_eq!(updated, book);
    assert_eq!(recorder.bodies.lock().unwrap()[0]["id"], 7);
}

#[tokio::test]
async fn test_update_not_found_is_status_error() {
    let (service, _recorder) = catalog_server().await;

    let err = service.update(404, &draft_book()).await.unwrap_err();

    assert_eq!(
        err,
        ServiceError::Status {
            status: 404,
            body: "no such book".to_string(),
        }
    );
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let app = Router::new().route(
        "/api/books",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_server(app).await;
    let service = HttpBookService::new(&base, Duration::from_secs(5)).unwrap();

    let err = service.list("x", SortDirection::Desc).await.unwrap_err();

    assert!(matches!(err, ServiceError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_missing_data_is_malformed() {
    let app = Router::new().route("/api/books", get(|| async { Json(json!({"books": []})) }));
    let base = spawn_server(app).await;
    let service = HttpBookService::new(&base, Duration::from_secs(5)).unwrap();

    let err = service.list("dune", SortDirection::Asc).await.unwrap_err();

    assert!(err.is_malformed());
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let service = HttpBookService::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();

    let err = service.list("dune", SortDirection::Asc).await.unwrap_err();

    assert!(matches!(err, ServiceError::Network(_)));
}
