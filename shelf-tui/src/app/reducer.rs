//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State`, with no I/O. Anything that needs the network
//! or the shared catalog is pushed onto `AppState::pending` as a
//! [`Command`] and run by the event loop after the reducer returns.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libbookshelf::service::SearchOutcome;

use super::actions::{Action, Command, SaveResult};
use super::state::{AppState, Focus, FormState, StatusBarState};

/// Shown in the error overlay when a save fails
pub const SAVE_ERROR_MESSAGE: &str = "Error saving book. Please try again.";

/// Pure reducer function
///
/// Takes current state and an action, returns new state.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === UI Events ===
        Action::Key(key) => handle_key(state, key),
        Action::Tick => state,
        Action::Resize(_, _) => state,

        // === Navigation ===
        Action::Quit => AppState {
            should_quit: true,
            ..state
        },

        Action::ShowHelp => AppState {
            help_visible: true,
            ..state
        },

        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        Action::FocusSearch => AppState {
            focus: Focus::Search,
            ..state
        },

        Action::FocusResults => AppState {
            focus: Focus::Results,
            ..state
        },

        // === Search ===
        Action::SearchInputChanged(input) => {
            let mut state = state;
            state.search.input = input;
            state
        }

        Action::SearchSubmitted => {
            if state.is_loading() {
                return set_status(state, "Search in progress");
            }
            let mut state = state;
            state.search.query = state.search.input.clone();
            state.focus = Focus::Results;
            queue_search(state, false)
        }

        Action::ToggleSort => {
            if state.is_loading() {
                return state;
            }
            let mut state = state;
            state.search.direction = state.search.direction.toggled();
            queue_search(state, false)
        }

        Action::Refresh => {
            if state.is_loading() {
                return state;
            }
            let state = set_status(state, "Refreshing...");
            queue_search(state, true)
        }

        Action::SearchFinished(Ok(outcome)) => {
            let mut state = state;
            if outcome.resets_pagination() {
                state.pagination.reset();
                state.selected = 0;
            }
            match outcome {
                SearchOutcome::CacheHit { count } => {
                    set_status(state, &format!("{} (cached)", books_label(count)))
                }
                SearchOutcome::Fetched { count } => set_status(state, &books_label(count)),
                SearchOutcome::Empty => set_status(state, "No results found"),
                SearchOutcome::Superseded => state,
            }
        }

        Action::SearchFinished(Err(error)) => {
            set_status(state, &format!("Error searching books: {}", error))
        }

        Action::CatalogSynced(snapshot) => {
            let mut state = state;
            state.catalog = snapshot;
            let total = state.total();
            state.pagination.clamp(total);
            clamp_selection(state)
        }

        // === Results ===
        Action::SelectNext => {
            let mut state = state;
            if state.selected + 1 < state.page_books().len() {
                state.selected += 1;
            }
            state
        }

        Action::SelectPrev => AppState {
            selected: state.selected.saturating_sub(1),
            ..state
        },

        Action::NextPage => {
            if state.is_loading() {
                return state;
            }
            let mut state = state;
            let total = state.total();
            state.pagination.next(total);
            state.selected = 0;
            state
        }

        Action::PrevPage => {
            if state.is_loading() {
                return state;
            }
            let mut state = state;
            state.pagination.prev();
            state.selected = 0;
            state
        }

        // === Form ===
        Action::OpenCreateForm => {
            if state.is_loading() {
                return state;
            }
            let mut state = state;
            state.form = Some(FormState::create());
            state.pending.push(Command::OpenForm(None));
            state
        }

        Action::OpenEditForm => {
            let Some(book) = state.selected_book().cloned() else {
                return state;
            };
            let mut state = state;
            state.form = Some(FormState::edit(&book));
            state.pending.push(Command::OpenForm(Some(book)));
            state
        }

        Action::CloseForm => {
            if state.form.is_none() || state.is_saving() {
                return state;
            }
            let mut state = state;
            state.form = None;
            state.pending.push(Command::CloseForm);
            state
        }

        Action::FormNextField => map_form(state, |form| form.active = form.active.next()),

        Action::FormPrevField => map_form(state, |form| form.active = form.active.prev()),

        Action::FormInput(c) => map_form(state, |form| {
            if !form.saving {
                form.draft.field_mut(form.active).push(c);
            }
        }),

        Action::FormBackspace => map_form(state, |form| {
            if !form.saving {
                form.draft.field_mut(form.active).pop();
            }
        }),

        Action::SaveRequested => {
            let Some(form) = state.form.as_ref() else {
                return state;
            };
            if form.saving {
                return state;
            }

            let problems = form.draft.problems();
            if !problems.is_empty() {
                let message = format!("Fix {} problem(s) before saving", problems.len());
                let state = map_form(state, |form| form.errors = problems);
                return set_status(state, &message);
            }

            let draft = form.draft.clone();
            let mut state = map_form(state, |form| {
                form.saving = true;
                form.errors.clear();
            });
            state.pending.push(Command::Save(draft));
            set_status(state, "Saving...")
        }

        Action::SaveFinished(result) => match result {
            SaveResult::Updated { title } => {
                let state = AppState { form: None, ..state };
                set_status(state, &format!("Updated \"{}\"", title))
            }
            SaveResult::Created {
                title,
                refresh_error,
            } => {
                let mut state = AppState { form: None, ..state };
                state.pagination.reset();
                state.selected = 0;
                let message = match refresh_error {
                    None => format!("Added \"{}\"", title),
                    Some(e) => format!("Added \"{}\" but refreshing the list failed: {}", title, e),
                };
                set_status(state, &message)
            }
            SaveResult::Failed { error } => {
                let state = map_form(state, |form| {
                    form.saving = false;
                    form.errors = vec![error];
                });
                AppState {
                    error: Some(SAVE_ERROR_MESSAGE.to_string()),
                    ..state
                }
            }
        },

        // === Error Handling ===
        Action::ShowError(error) => AppState {
            error: Some(error),
            ..state
        },

        Action::DismissError => AppState {
            error: None,
            ..state
        },

        // === Status Bar ===
        Action::SetStatus(message) => set_status(state, &message),

        Action::ClearStatus => AppState {
            status: StatusBarState { message: None },
            ..state
        },
    }
}

fn set_status(state: AppState, message: &str) -> AppState {
    AppState {
        status: StatusBarState {
            message: Some(message.to_string()),
        },
        ..state
    }
}

fn books_label(count: usize) -> String {
    match count {
        1 => "1 book".to_string(),
        n => format!("{} books", n),
    }
}

fn queue_search(mut state: AppState, force: bool) -> AppState {
    state.pending.push(Command::Search {
        query: state.search.query.clone(),
        direction: state.search.direction,
        force,
    });
    state
}

fn clamp_selection(mut state: AppState) -> AppState {
    let on_page = state.page_books().len();
    state.selected = state.selected.min(on_page.saturating_sub(1));
    state
}

fn map_form(mut state: AppState, f: impl FnOnce(&mut FormState)) -> AppState {
    if let Some(form) = state.form.as_mut() {
        f(form);
    }
    state
}

/// Handle keyboard input
///
/// Maps keys to high-level actions. This is where keybindings are defined.
fn handle_key(state: AppState, key: KeyEvent) -> AppState {
    // The error overlay swallows everything until dismissed
    if state.error.is_some() {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => reduce(state, Action::DismissError),
            _ => state,
        };
    }

    // Global keybindings (work everywhere)
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) if !state.is_saving() => {
            return reduce(state, Action::Quit);
        }

        (KeyCode::F(1), _) => {
            let action = if state.help_visible {
                Action::HideHelp
            } else {
                Action::ShowHelp
            };
            return reduce(state, action);
        }

        (KeyCode::Esc, _) if state.help_visible => {
            return reduce(state, Action::HideHelp);
        }

        _ if state.help_visible => return state,

        _ => {}
    }

    if state.form.is_some() {
        return handle_form_key(state, key);
    }

    match state.focus {
        Focus::Search => handle_search_key(state, key),
        Focus::Results => handle_results_key(state, key),
    }
}

/// Text editing in the search bar happens in the event loop; only submit and
/// leave reach the reducer
fn handle_search_key(state: AppState, key: KeyEvent) -> AppState {
    match key.code {
        KeyCode::Enter => reduce(state, Action::SearchSubmitted),
        KeyCode::Esc | KeyCode::Tab => reduce(state, Action::FocusResults),
        _ => state,
    }
}

fn handle_results_key(state: AppState, key: KeyEvent) -> AppState {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return state;
    }

    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('/') => Action::FocusSearch,
        KeyCode::Char('s') => Action::ToggleSort,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('a') => Action::OpenCreateForm,
        KeyCode::Char('e') | KeyCode::Enter => Action::OpenEditForm,
        KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::SelectPrev,
        KeyCode::Char('n') | KeyCode::PageDown | KeyCode::Right => Action::NextPage,
        KeyCode::Char('p') | KeyCode::PageUp | KeyCode::Left => Action::PrevPage,
        KeyCode::Esc => Action::ClearStatus,
        _ => return state,
    };
    reduce(state, action)
}

fn handle_form_key(state: AppState, key: KeyEvent) -> AppState {
    let action = match (key.code, key.modifiers) {
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::SaveRequested,
        (KeyCode::Esc, _) => Action::CloseForm,
        (KeyCode::Tab, _) | (KeyCode::Down, _) | (KeyCode::Enter, _) => Action::FormNextField,
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => Action::FormPrevField,
        (KeyCode::Backspace, _) => Action::FormBackspace,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::FormInput(c)
        }
        _ => return state,
    };
    reduce(state, action)
}
