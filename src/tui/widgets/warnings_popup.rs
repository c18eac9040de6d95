//! Scrollable list of load and gallery warnings.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::centered_rect;
use crate::i18n;
use crate::tui::app::App;

/// Render the warnings popup centered on screen.
pub fn render(frame: &mut Frame, app: &App) {
    let theme = app.theme();
    let area = centered_rect(80, 60, frame.area());
    frame.render_widget(Clear, area);

    let title = format!("{}({}) ", i18n::tui_warnings_title(), app.warnings.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.popup_title)
        .title(title)
        .style(theme.popup);

    let lines: Vec<Line> = if app.warnings.is_empty() {
        vec![Line::from(Span::styled(
            format!(" {}", i18n::tui_no_warnings()),
            theme.help_dim,
        ))]
    } else {
        app.warnings
            .iter()
            .skip(app.warnings_scroll)
            .map(|w| {
                Line::from(vec![
                    Span::styled(format!(" {:<18}", w.kind()), theme.error),
                    Span::styled(w.to_string(), theme.popup),
                ])
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
