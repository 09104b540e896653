//! ServiceHandle against the in-memory book service
//!
//! Commands go in, results come back on the event channel, and the shared
//! catalog reflects the work.

use std::sync::Arc;
use std::time::Duration;

use libbookshelf::client::mock::MockBookService;
use libbookshelf::clock::ManualClock;
use libbookshelf::error::ServiceError;
use libbookshelf::service::{CatalogService, SearchOutcome};
use libbookshelf::{Book, BookDraft, CatalogState, SortDirection};
use shelf_tui::app::{reduce, Action, AppState, Command, SaveResult};
use shelf_tui::services::{ServiceEvent, ServiceHandle};

const WAIT: Duration = Duration::from_secs(5);

fn book(id: i64, title: &str) -> Book {
    Book {
        id: Some(id),
        title: title.to_string(),
        author: "Ursula K. Le Guin".to_string(),
        country: "USA".to_string(),
        language: "English".to_string(),
        link: String::new(),
        pages: "300".to_string(),
        year: "1969".to_string(),
    }
}

fn handle(mock: &MockBookService) -> ServiceHandle {
    let service = CatalogService::with_backend(
        Arc::new(mock.clone()),
        CatalogState::shared(Duration::from_secs(300)),
        Arc::new(ManualClock::default()),
    );
    ServiceHandle::with_service(service).unwrap()
}

fn search(query: &str, force: bool) -> Command {
    Command::Search {
        query: query.to_string(),
        direction: SortDirection::Asc,
        force,
    }
}

#[test]
fn test_search_reports_outcome_and_fills_catalog() {
    let mock = MockBookService::with_books(vec![
        book(1, "The Left Hand of Darkness"),
        book(2, "The Dispossessed"),
    ]);
    let services = handle(&mock);
    let events = services.events();

    services.execute(search("", false));

    match events.recv_timeout(WAIT).unwrap() {
        ServiceEvent::SearchFinished(Ok(SearchOutcome::Fetched { count })) => assert_eq!(count, 2),
        other => panic!("Expected Fetched, got {:?}", other),
    }
    let snapshot = services.snapshot();
    assert_eq!(snapshot.results[0].title, "The Dispossessed");
    assert!(!snapshot.is_loading);
    assert_eq!(services.backend_name(), "mock");
}

#[test]
fn test_repeat_search_is_cache_hit() {
    let mock = MockBookService::with_books(vec![book(1, "Lavinia")]);
    let services = handle(&mock);
    let events = services.events();

    services.execute(search("lav", false));
    events.recv_timeout(WAIT).unwrap();
    services.execute(search("lav", false));

    match events.recv_timeout(WAIT).unwrap() {
        ServiceEvent::SearchFinished(Ok(outcome)) => {
            assert_eq!(outcome, SearchOutcome::CacheHit { count: 1 })
        }
        other => panic!("Expected cache hit, got {:?}", other),
    }
    assert_eq!(mock.list_call_count(), 1);
}

#[test]
fn test_search_failure_is_reported_as_text() {
    let mock = MockBookService::new();
    mock.fail_list(ServiceError::Status {
        status: 500,
        body: "boom".to_string(),
    });
    let services = handle(&mock);
    let events = services.events();

    services.execute(search("x", false));

    match events.recv_timeout(WAIT).unwrap() {
        ServiceEvent::SearchFinished(Err(message)) => assert!(message.contains("500")),
        other => panic!("Expected failure, got {:?}", other),
    }
    assert!(services.snapshot().results.is_empty());
}

#[test]
fn test_form_commands_reach_shared_catalog() {
    let mock = MockBookService::new();
    let services = handle(&mock);

    services.execute(Command::OpenForm(Some(book(3, "Tehanu"))));
    let snapshot = services.snapshot();
    assert!(snapshot.is_form_open);
    assert_eq!(snapshot.selected_book.map(|b| b.title), Some("Tehanu".to_string()));

    services.execute(Command::CloseForm);
    assert!(!services.snapshot().is_form_open);
}

#[test]
fn test_save_update_reports_title() {
    let mock = MockBookService::with_books(vec![book(1, "Lavinia")]);
    let services = handle(&mock);
    let events = services.events();

    services.execute(search("", false));
    events.recv_timeout(WAIT).unwrap();

    let mut draft = BookDraft::from_book(&book(1, "Lavinia"));
    draft.title = "Lavinia (2008)".to_string();
    services.execute(Command::Save(draft));

    match events.recv_timeout(WAIT).unwrap() {
        ServiceEvent::SaveFinished(result) => assert_eq!(
            result,
            SaveResult::Updated {
                title: "Lavinia (2008)".to_string()
            }
        ),
        other => panic!("Expected save result, got {:?}", other),
    }
    assert_eq!(services.snapshot().results[0].title, "Lavinia (2008)");
}

#[test]
fn test_save_create_refreshes_results() {
    let mock = MockBookService::with_books(vec![book(1, "Lavinia")]);
    let services = handle(&mock);
    let events = services.events();

    services.execute(search("", false));
    events.recv_timeout(WAIT).unwrap();

    let draft = BookDraft {
        id: None,
        ..BookDraft::from_book(&book(0, "A Wizard of Earthsea"))
    };
    services.execute(Command::Save(draft));

    match events.recv_timeout(WAIT).unwrap() {
        ServiceEvent::SaveFinished(SaveResult::Created { title, refresh_error }) => {
            assert_eq!(title, "A Wizard of Earthsea");
            assert!(refresh_error.is_none());
        }
        other => panic!("Expected created, got {:?}", other),
    }
    let titles: Vec<String> = services.snapshot().results.into_iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["A Wizard of Earthsea", "Lavinia"]);
    assert_eq!(mock.list_call_count(), 2);
}

#[test]
fn test_save_failure_is_reported() {
    let mock = MockBookService::with_books(vec![book(1, "Lavinia")]);
    mock.fail_writes(ServiceError::Network("connection refused".to_string()));
    let services = handle(&mock);
    let events = services.events();
    services.execute(Command::OpenForm(Some(book(1, "Lavinia"))));

    services.execute(Command::Save(BookDraft::from_book(&book(1, "Lavinia"))));

    match events.recv_timeout(WAIT).unwrap() {
        ServiceEvent::SaveFinished(SaveResult::Failed { error }) => {
            assert!(error.contains("connection refused"))
        }
        other => panic!("Expected failure, got {:?}", other),
    }
    assert!(services.snapshot().is_form_open);
}

#[test]
fn test_events_drive_the_reducer() {
    let mock = MockBookService::with_books(vec![book(1, "Lavinia"), book(2, "Tehanu")]);
    let services = handle(&mock);
    let events = services.events();

    let mut state = reduce(AppState::new(), Action::SearchSubmitted);
    for command in state.take_commands() {
        services.execute(command);
    }
    let event = events.recv_timeout(WAIT).unwrap();
    state = reduce(state, event.into());
    state = reduce(state, Action::CatalogSynced(services.snapshot()));

    assert_eq!(state.status.message.as_deref(), Some("2 books"));
    assert_eq!(state.page_books().len(), 2);
    assert_eq!(state.selected_book().map(|b| b.title.as_str()), Some("Lavinia"));
}
