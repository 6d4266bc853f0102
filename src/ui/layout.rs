//! Layout components (content column, status bar)

use crate::app::App;
use crate::state::{FocusTarget, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Widest the content column gets
const MAX_CONTENT_WIDTH: u16 = 80;

/// Create the main layout: a centered column above the status bar
pub fn create_layout(area: Rect) -> Rect {
    // Reserve bottom line for status bar
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let content = rows[0];
    let width = content.width.min(MAX_CONTENT_WIDTH);
    Rect {
        x: content.x + (content.width - width) / 2,
        width,
        ..content
    }
}

/// Key hints for the current view and focus
fn get_view_hints(app: &App) -> &'static str {
    match app.state.current_view {
        View::Complete => "r: run setup again | q/Enter: quit",
        View::Setup => match app.state.form.active_field {
            FocusTarget::Email => "Tab: next | type to edit | Ctrl+U: clear | Ctrl+S: submit | Esc: quit",
            FocusTarget::Consent => "Tab: next | Space: toggle | Ctrl+S: submit | Esc: quit",
            FocusTarget::SecurityCheck => "Tab: next | a: acknowledge | Ctrl+S: submit | Esc: quit",
            FocusTarget::Submit => "Tab: next | Enter: submit | Esc: quit",
        },
    }
}

/// Draw the status bar at the bottom of the screen
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Submission indicator
    let indicator = if app.state.form.is_submitting {
        Span::styled(" ◌ ", Style::default().fg(Color::Yellow))
    } else if app.state.form.can_submit() {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::DarkGray))
    };
    spans.push(indicator);

    spans.push(Span::styled(
        get_view_hints(app),
        Style::default().fg(Color::DarkGray),
    ));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), status_area);
}
