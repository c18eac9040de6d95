//! Main render function that dispatches to widgets.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::Block;
use ratatui::Frame;

use super::app::App;
use super::widgets;

/// Render the entire TUI frame.
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    // Paint the background so the light theme covers the whole terminal
    let theme = app.theme();
    frame.render_widget(Block::default().style(theme.popup), size);

    // Vertical layout: header (1) + feed (flex) + status (1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header bar
            Constraint::Min(5),    // conversation
            Constraint::Length(1), // status bar or keyword bar
        ])
        .split(size);

    widgets::header_bar::render(frame, app, vertical[0]);
    widgets::chat_view::render(frame, app, vertical[1]);

    if app.search_active {
        widgets::search_bar::render(frame, app, vertical[2]);
    } else if app.page_input.is_some() {
        widgets::search_bar::render_page_prompt(frame, app, vertical[2]);
    } else {
        widgets::status_bar::render(frame, app, vertical[2]);
    }

    // Popups (rendered on top of everything)
    if app.gallery.is_some() {
        widgets::gallery_popup::render(frame, app);
    }
    if app.show_warnings {
        widgets::warnings_popup::render(frame, app);
    }
    if app.date_input.is_some() {
        widgets::date_popup::render(frame, app);
    }
    if app.show_help {
        widgets::help_popup::render(frame, app);
    }
}
