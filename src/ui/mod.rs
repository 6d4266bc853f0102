//! UI module for rendering the TUI

mod complete;
mod components;
mod forms;
mod layout;

use crate::app::App;
use crate::state::View;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let main_area = layout::create_layout(frame.area());

    match &app.state.current_view {
        View::Setup => forms::draw_setup_form(frame, main_area, app),
        View::Complete => complete::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error);
    }
}
