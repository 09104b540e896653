//! Add/edit form modal

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use libbookshelf::types::BookField;

use crate::app::{FormState, UiConfig};

use super::centered_rect;

/// Lines of the form body, one per field followed by any errors
pub fn form_lines(form: &FormState, config: &UiConfig) -> Vec<Line<'static>> {
    let accent = |c: Color| {
        if config.colors_enabled {
            Style::default().fg(c)
        } else {
            Style::default()
        }
    };

    let mut lines = Vec::with_capacity(BookField::ALL.len() + form.errors.len() + 2);
    for field in BookField::ALL {
        let active = field == form.active;
        let marker = if active { "> " } else { "  " };
        let required = if field.is_required() { "*" } else { " " };
        let label_style = if active {
            accent(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut value = form.draft.field(field).to_string();
        if active && !form.saving {
            value.push('_');
        }

        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<9}{} ", marker, field.label(), required), label_style),
            Span::raw(value),
        ]));
    }

    if !form.errors.is_empty() {
        lines.push(Line::from(""));
        for error in &form.errors {
            lines.push(Line::from(Span::styled(error.clone(), accent(Color::Red))));
        }
    }

    lines.push(Line::from(""));
    let hint = if form.saving {
        "Saving...".to_string()
    } else {
        "Tab: Next field | Ctrl+S: Save | Esc: Cancel".to_string()
    };
    lines.push(Line::from(Span::styled(hint, accent(Color::Gray))));

    lines
}

pub fn render_form(frame: &mut Frame, area: Rect, form: &FormState, config: &UiConfig) {
    let popup_area = centered_rect(70, 70, area);

    let border = if form.saving {
        Color::Yellow
    } else if form.errors.is_empty() {
        Color::Cyan
    } else {
        Color::Red
    };

    let widget = Paragraph::new(form_lines(form, config))
        .block(
            Block::default()
                .title(format!(" {} ", form.title()))
                .borders(Borders::ALL)
                .border_style(if config.colors_enabled {
                    Style::default().fg(border)
                } else {
                    Style::default()
                }),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(widget, popup_area);
}
