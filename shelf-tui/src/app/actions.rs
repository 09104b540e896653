//! Actions for the reducer pattern
//!
//! All state transitions are triggered by actions. Key presses arrive as
//! `Action::Key` and are mapped to the higher-level actions below by the
//! reducer; results of background work arrive as `SearchFinished`,
//! `SaveFinished` and `CatalogSynced`.

use crossterm::event::KeyEvent;
use libbookshelf::service::SearchOutcome;
use libbookshelf::state::CatalogSnapshot;
use libbookshelf::{Book, BookDraft, SortDirection};

/// Actions that trigger state transitions
#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    /// Keyboard input event
    Key(KeyEvent),

    /// Periodic tick
    Tick,

    /// Terminal resize event
    Resize(u16, u16),

    // === Navigation ===
    Quit,
    ShowHelp,
    HideHelp,
    FocusSearch,
    FocusResults,

    // === Search ===
    /// Search bar text changed
    SearchInputChanged(String),

    /// Run the text in the search bar as the new query
    SearchSubmitted,

    /// Flip the sort direction and search again
    ToggleSort,

    /// Search the current query again, bypassing the cache
    Refresh,

    /// A search finished; `Err` carries the display form of the service error
    SearchFinished(Result<SearchOutcome, String>),

    /// The shared catalog changed
    CatalogSynced(CatalogSnapshot),

    // === Results ===
    SelectNext,
    SelectPrev,
    NextPage,
    PrevPage,

    // === Form ===
    OpenCreateForm,
    OpenEditForm,
    CloseForm,
    FormNextField,
    FormPrevField,
    /// Type a character into the active field
    FormInput(char),
    FormBackspace,
    SaveRequested,
    SaveFinished(SaveResult),

    // === Error Handling ===
    ShowError(String),
    DismissError,

    // === Status Bar ===
    SetStatus(String),
    ClearStatus,
}

/// How a form submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResult {
    Updated { title: String },
    /// `refresh_error` is set when the book was created but re-fetching the
    /// list afterwards failed
    Created {
        title: String,
        refresh_error: Option<String>,
    },
    Failed { error: String },
}

/// Side effects requested by the reducer, run by the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search {
        query: String,
        direction: SortDirection,
        force: bool,
    },
    /// Mirror the form opening into the shared catalog; `None` is create mode
    OpenForm(Option<Book>),
    CloseForm,
    Save(BookDraft),
}
