//! Application state
//!
//! All state transitions happen through the reducer (see `reducer.rs`).
//! `catalog` is a copy of the shared catalog taken by the event loop; the
//! rest is presentation state that only the TUI needs.

use libbookshelf::state::CatalogSnapshot;
use libbookshelf::types::BookField;
use libbookshelf::{Book, BookDraft, Pagination, SortDirection};

use super::actions::Command;

/// Which part of the main screen receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Results,
    Search,
}

/// Root application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub should_quit: bool,

    pub focus: Focus,

    pub help_visible: bool,

    pub search: SearchState,

    /// Latest copy of the shared catalog
    pub catalog: CatalogSnapshot,

    pub pagination: Pagination,

    /// Index of the highlighted book within the current page
    pub selected: usize,

    /// Add/edit form, when open
    pub form: Option<FormState>,

    pub status: StatusBarState,

    /// Error overlay state
    pub error: Option<String>,

    /// Commands queued for the event loop
    pub pending: Vec<Command>,

    pub config: UiConfig,
}

/// Search bar contents and the query currently shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Text in the search bar
    pub input: String,

    /// Last submitted query; sort toggles and refreshes reuse it
    pub query: String,

    pub direction: SortDirection,
}

/// Add/edit form state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub draft: BookDraft,
    pub active: BookField,
    /// A save request is in flight; independent of the catalog's loading flag
    pub saving: bool,
    pub errors: Vec<String>,
}

impl FormState {
    pub fn create() -> Self {
        Self {
            draft: BookDraft::new(),
            active: BookField::Title,
            saving: false,
            errors: Vec::new(),
        }
    }

    pub fn edit(book: &Book) -> Self {
        Self {
            draft: BookDraft::from_book(book),
            ..Self::create()
        }
    }

    pub fn title(&self) -> &'static str {
        if self.draft.is_edit() {
            "Edit Book"
        } else {
            "Add New Book"
        }
    }
}

/// Status bar state
#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    pub message: Option<String>,
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors_enabled: bool,

    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,

    /// Books per page
    pub page_size: usize,
}

impl UiConfig {
    /// Take page size and tick rate from the loaded configuration
    pub fn from_config(ui: &libbookshelf::config::UiConfig) -> Self {
        Self {
            page_size: ui.page_size,
            tick_rate_ms: ui.tick_rate_ms,
            ..Self::default()
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled =
            std::env::var("NO_COLOR").is_err() && std::env::var("BOOKSHELF_NO_COLOR").is_err();

        Self {
            colors_enabled,
            tick_rate_ms: 100,
            page_size: libbookshelf::pagination::DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(UiConfig::default())
    }
}

impl AppState {
    /// Create new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UiConfig) -> Self {
        Self {
            should_quit: false,
            focus: Focus::Results,
            help_visible: false,
            search: SearchState::default(),
            catalog: CatalogSnapshot::default(),
            pagination: Pagination::new(config.page_size),
            selected: 0,
            form: None,
            status: StatusBarState::default(),
            error: None,
            pending: Vec::new(),
            config,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.is_loading
    }

    pub fn is_saving(&self) -> bool {
        self.form.as_ref().map_or(false, |f| f.saving)
    }

    /// Total number of books in the current results
    pub fn total(&self) -> usize {
        self.catalog.results.len()
    }

    /// Books on the current page
    pub fn page_books(&self) -> &[Book] {
        self.pagination.slice(&self.catalog.results)
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.page_books().get(self.selected)
    }

    /// Whether typed characters should go to the search bar
    pub fn accepts_search_input(&self) -> bool {
        self.focus == Focus::Search
            && self.form.is_none()
            && !self.help_visible
            && self.error.is_none()
    }

    /// Remove and return the queued commands
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }
}
