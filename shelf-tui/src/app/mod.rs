//! Application module
//!
//! Contains the core application architecture:
//! - Actions: What can happen
//! - State: What is true right now
//! - Reducer: Pure function (State, Action) -> State
//!
//! Work the reducer cannot do itself (network calls, touching the shared
//! catalog) is queued on the state as [`Command`]s and carried out by the
//! event loop.

pub mod actions;
pub mod event;
pub mod reducer;
pub mod state;

// Re-export commonly used types
pub use actions::{Action, Command, SaveResult};
pub use reducer::reduce;
pub use state::{AppState, Focus, FormState, SearchState, StatusBarState, UiConfig};
