//! Initial setup form rendering

use super::field_renderer::{draw_field, draw_field_error, draw_help_text};
use crate::app::App;
use crate::messages::Messages;
use crate::state::{
    setup_fields, FieldError, FieldName, FocusTarget, FormField, SecurityCheckStatus,
};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows drawn for one field, top to bottom
enum Row<'a> {
    Field(&'a FormField),
    Description(&'a str),
    Error(&'a FormField),
    SecurityCheck,
    Submit,
}

impl Row<'_> {
    fn height(&self) -> u16 {
        match self {
            Row::Field(_) => 3,
            Row::Description(_) => 2,
            Row::Error(_) => 1,
            Row::SecurityCheck => 4,
            Row::Submit => BUTTON_HEIGHT,
        }
    }
}

/// Draw the setup form
pub fn draw_setup_form(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;
    let messages = &app.messages;

    let block = Block::default()
        .title(format!(" {} ", messages.format("setupForm.title")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = setup_fields(form, messages);
    let mut rows = Vec::new();
    for field in &fields {
        rows.push(Row::Field(field));
        if let Some(description) = &field.description {
            rows.push(Row::Description(description));
        }
        rows.push(Row::Error(field));
    }
    rows.push(Row::SecurityCheck);
    rows.push(Row::Submit);

    let constraints: Vec<Constraint> = rows
        .iter()
        .map(|row| Constraint::Length(row.height()))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    for (row, chunk) in rows.iter().zip(chunks.iter()) {
        match row {
            Row::Field(field) => {
                draw_field(frame, *chunk, field, form.active_field == field.focus_target())
            }
            Row::Description(text) => draw_help_text(frame, *chunk, text),
            Row::Error(field) => draw_field_error(frame, *chunk, field),
            Row::SecurityCheck => draw_security_check(frame, *chunk, app),
            Row::Submit => {
                let label = if form.is_submitting {
                    messages.format("setupForm.submitting")
                } else {
                    messages.format("setupForm.submit")
                };
                let width = chunk.width.min(30);
                let button_area = Rect {
                    x: chunk.x + (chunk.width - width) / 2,
                    width,
                    ..*chunk
                };
                render_button(
                    frame,
                    button_area,
                    &label,
                    form.active_field == FocusTarget::Submit,
                    form.can_submit(),
                );
            }
        }
    }
}

fn status_style(status: Option<SecurityCheckStatus>) -> (&'static str, Color) {
    match status {
        Some(SecurityCheckStatus::Succeeded) => ("✓", Color::Green),
        Some(SecurityCheckStatus::Ignored) => ("!", Color::Yellow),
        Some(SecurityCheckStatus::CheckFailed) => ("?", Color::Yellow),
        Some(SecurityCheckStatus::Failed) => ("✗", Color::Red),
        Some(SecurityCheckStatus::Loading) | None => ("…", Color::DarkGray),
    }
}

fn error_line(messages: &Messages, err: FieldError) -> Line<'static> {
    Line::from(Span::styled(
        messages.format(err.message_key()),
        Style::default().fg(Color::Red),
    ))
}

/// Draw the security check result and, when it failed, how to proceed
fn draw_security_check(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;
    let messages = &app.messages;
    let is_active = form.active_field == FocusTarget::SecurityCheck;
    let status = form.security_status();

    let host = app
        .state
        .security_host
        .clone()
        .unwrap_or_else(|| messages.format("setupForm.securityCheck.unknownHost"));
    let text = match status {
        Some(s) => messages.format_with(s.message_key(), &[("host", host.as_str())]),
        None => messages.format("form.empty.error"),
    };

    let (icon, color) = status_style(status);
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{icon} "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(text),
    ])];
    if status == Some(SecurityCheckStatus::Failed) {
        lines.push(Line::from(Span::styled(
            messages.format("setupForm.securityCheck.acknowledge"),
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(err) = form.visible_error(FieldName::SecurityCheck) {
        lines.push(error_line(messages, err));
    }

    let border = if is_active { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(format!(
            " {} ",
            messages.format("setupForm.securityCheck.title")
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}
