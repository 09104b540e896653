//! Single-line search input backed by tui-textarea
//!
//! The textarea keeps the cursor and editing state; the text is copied into
//! `AppState` through `Action::SearchInputChanged` after every edit.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::{CursorMove, TextArea};

pub const PLACEHOLDER: &str = "Search for books...";

/// Stateful search input
pub struct SearchBar {
    textarea: TextArea<'static>,
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
        }
    }

    /// Apply an editing key
    ///
    /// Returns false for keys the reducer handles (Enter, Esc, Tab, chords),
    /// which leave the text untouched.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => {
                self.textarea.insert_char(c);
            }
            KeyCode::Backspace => {
                self.textarea.delete_char();
            }
            KeyCode::Delete => {
                self.textarea.delete_next_char();
            }
            KeyCode::Left => self.textarea.move_cursor(CursorMove::Back),
            KeyCode::Right => self.textarea.move_cursor(CursorMove::Forward),
            KeyCode::Home => self.textarea.move_cursor(CursorMove::Head),
            KeyCode::End => self.textarea.move_cursor(CursorMove::End),
            _ => return false,
        }
        true
    }

    pub fn content(&self) -> String {
        self.textarea.lines().concat()
    }

    /// Cursor position in characters from the start of the text
    pub fn cursor(&self) -> usize {
        self.textarea.cursor().1
    }
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_editing() {
        let mut bar = SearchBar::new();
        for c in "dnue".chars() {
            assert!(bar.input(key(KeyCode::Char(c))));
        }
        bar.input(key(KeyCode::Left));
        bar.input(key(KeyCode::Left));
        bar.input(key(KeyCode::Backspace));
        bar.input(key(KeyCode::Right));
        bar.input(key(KeyCode::Char('n')));

        assert_eq!(bar.content(), "dune");
        assert_eq!(bar.cursor(), 3);
    }

    #[test]
    fn test_reducer_keys_pass_through() {
        let mut bar = SearchBar::new();
        assert!(!bar.input(key(KeyCode::Enter)));
        assert!(!bar.input(key(KeyCode::Esc)));
        assert!(!bar.input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert_eq!(bar.content(), "");
    }
}
