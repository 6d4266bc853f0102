//! Setup complete screen

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" {} ", app.messages.format("setupForm.title")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let mut lines = vec![Line::from("")];
    match &app.state.workspace {
        Some(workspace) => {
            let id = workspace.workspace_id.to_string();
            lines.push(Line::from(Span::styled(
                app.messages
                    .format_with("setupForm.complete", &[("workspaceId", id.as_str())]),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            if let Some(email) = &workspace.email {
                lines.push(Line::from(format!("  {email}")));
            }
            lines.push(Line::from(Span::styled(
                format!(
                    "  updated {}",
                    workspace.updated_at.format("%Y-%m-%d %H:%M UTC")
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => lines.push(Line::from(app.messages.format("setupForm.title"))),
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}
