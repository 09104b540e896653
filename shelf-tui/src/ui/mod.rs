//! UI rendering
//!
//! Render functions draw the state into a frame and change nothing.
//! The main screen is, top to bottom: header, search bar, result summary,
//! grid of book cards, pagination footer and status bar. The add/edit form,
//! help and errors are drawn as overlays.

pub mod form;
pub mod search_bar;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use libbookshelf::Book;

use crate::app::{AppState, Focus};
use search_bar::SearchBar;

/// Height of one book card, borders included
pub const CARD_HEIGHT: u16 = 9;

/// Render the application UI
pub fn render(frame: &mut Frame, state: &AppState, search_bar: &SearchBar) {
    let area = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Search bar
            Constraint::Length(1), // Summary
            Constraint::Min(3),    // Results
            Constraint::Length(1), // Pagination
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], state);
    render_search_bar(frame, chunks[1], state, search_bar);
    render_summary(frame, chunks[2], state);
    render_results(frame, chunks[3], state);
    render_pagination(frame, chunks[4], state);
    render_status_bar(frame, chunks[5], state);

    if let Some(ref form) = state.form {
        form::render_form(frame, area, form, &state.config);
    }

    if state.help_visible {
        render_help_overlay(frame, area);
    }

    if let Some(ref error) = state.error {
        render_error_overlay(frame, area, error, state);
    }
}

fn color(state: &AppState, color: Color) -> Style {
    if state.config.colors_enabled {
        Style::default().fg(color)
    } else {
        Style::default()
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let sort = format!("Sort: {}", state.search.direction);
    let query = if state.search.query.is_empty() {
        "All books".to_string()
    } else {
        format!("\"{}\"", state.search.query)
    };

    let line = Line::from(vec![
        Span::styled(
            " Book Search ",
            color(state, Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(query),
        Span::raw(" | "),
        Span::styled(sort, color(state, Color::Yellow)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_search_bar(frame: &mut Frame, area: Rect, state: &AppState, search_bar: &SearchBar) {
    let focused = state.accepts_search_input();
    let title = if state.is_loading() {
        " Searching... "
    } else {
        " Search "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            color(state, Color::Green)
        } else {
            Style::default()
        });

    let content = search_bar.content();
    let text = if content.is_empty() && !focused {
        Line::from(Span::styled(
            search_bar::PLACEHOLDER,
            color(state, Color::DarkGray),
        ))
    } else {
        Line::from(content)
    };

    frame.render_widget(Paragraph::new(text).block(block), area);

    if focused {
        let x = area.x + 1 + search_bar.cursor() as u16;
        frame.set_cursor(x.min(area.right().saturating_sub(2)), area.y + 1);
    }
}

fn render_summary(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.is_loading() {
        return;
    }
    if let Some(summary) = state.pagination.summary(state.total()) {
        let text = Paragraph::new(summary).style(color(state, Color::Gray));
        frame.render_widget(text, area);
    }
}

/// Number of card columns that fit in `width`
pub fn grid_columns(width: u16) -> usize {
    match width {
        w if w >= 120 => 3,
        w if w >= 80 => 2,
        _ => 1,
    }
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.is_loading() {
        let loading = Paragraph::new(Line::from(Span::styled(
            "Loading...",
            color(state, Color::Blue),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(loading, centered_rect(100, 20, area));
        return;
    }

    let books = state.page_books();
    if books.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "No results found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Try a different search term",
                color(state, Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(empty, centered_rect(100, 30, area));
        return;
    }

    let columns = grid_columns(area.width);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = state.selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let rows: Vec<&[Book]> = books.chunks(columns).skip(first_row).take(visible_rows).collect();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            rows.iter()
                .map(|_| Constraint::Length(CARD_HEIGHT))
                .chain(std::iter::once(Constraint::Min(0)))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (row_offset, row_books) in rows.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_areas[row_offset]);

        for (col, book) in row_books.iter().enumerate() {
            let index = (first_row + row_offset) * columns + col;
            render_card(frame, cells[col], book, index == state.selected, state);
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, book: &Book, selected: bool, state: &AppState) {
    let border = if selected {
        color(state, Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(format!(" {} ", book.title))
        .borders(Borders::ALL)
        .border_style(border);

    let field = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(value.to_string()),
        ])
    };

    let mut lines = vec![
        field("Author", &book.author),
        field("Year", &book.year),
        field("Country", &book.country),
        field("Language", &book.language),
        field("Pages", &book.pages),
    ];
    if !book.link.is_empty() {
        lines.push(Line::from(Span::styled(
            book.link.clone(),
            color(state, Color::Blue).add_modifier(Modifier::UNDERLINED),
        )));
    }
    if selected {
        lines.push(Line::from(Span::styled(
            "e: Edit",
            color(state, Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// "Page x of y" line, or `None` when there is one page or less
pub fn pagination_line(state: &AppState) -> Option<String> {
    let total_pages = state.pagination.total_pages(state.total());
    if state.is_loading() || total_pages <= 1 {
        return None;
    }
    let page = state.pagination.page();
    let prev = if page > 1 { "< Previous (p)" } else { "" };
    let next = if page < total_pages { "Next (n) >" } else { "" };
    Some(format!("{}  Page {} of {}  {}", prev, page, total_pages, next).trim().to_string())
}

fn render_pagination(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(line) = pagination_line(state) {
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let message = state.status.message.clone().unwrap_or_default();
    let hints = match (state.form.is_some(), state.focus) {
        (true, _) => "Tab: Next field | Ctrl+S: Save | Esc: Cancel",
        (false, Focus::Search) => "Enter: Search | Esc: Back to results",
        (false, Focus::Results) => {
            "/: Search | s: Sort | r: Refresh | a: Add | e: Edit | n/p: Page | F1: Help | q: Quit"
        }
    };

    let lines = vec![
        Line::from(message),
        Line::from(Span::styled(hints, color(state, Color::Gray))),
    ];
    let status = Paragraph::new(lines).block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Results:"),
        Line::from("  /            - Search"),
        Line::from("  s            - Toggle sort (ASC/DESC)"),
        Line::from("  r            - Refresh (skip cache)"),
        Line::from("  a            - Add a book"),
        Line::from("  e / Enter    - Edit selected book"),
        Line::from("  j k / arrows - Select"),
        Line::from("  n p / PgDn PgUp - Next/previous page"),
        Line::from("  q            - Quit"),
        Line::from(""),
        Line::from("Form:"),
        Line::from("  Tab / Shift+Tab - Next/previous field"),
        Line::from("  Ctrl+S       - Save"),
        Line::from("  Esc          - Cancel"),
        Line::from(""),
        Line::from("Press Esc or F1 to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str, state: &AppState) {
    let popup_area = centered_rect(60, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Error",
            color(state, Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(color(state, Color::Red)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

/// Helper to create centered rectangle
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
