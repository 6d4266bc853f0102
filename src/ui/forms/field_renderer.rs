//! Field rendering utilities for forms

use crate::state::{FieldValue, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn focus_color(is_active: bool) -> Color {
    if is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    }
}

/// Draw a form field using FormField from the domain layer
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let border_color = if field.error.is_some() {
        Color::Red
    } else {
        focus_color(is_active)
    };

    let value_style = if field.shows_placeholder() {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::styled(field.display_value(), value_style)];
    if is_active && matches!(field.value, FieldValue::Text(_)) {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }

    let block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

/// Draw the inline validation message under a field, if any
pub fn draw_field_error(frame: &mut Frame, area: Rect, field: &FormField) {
    if let Some(error) = &field.error {
        let line = Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Draw muted help text, wrapped to the area
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(Span::styled(
        format!(" {text}"),
        Style::default().fg(Color::DarkGray),
    ))
    .wrap(Wrap { trim: true });
    frame.render_widget(help, area);
}
