//! Input bars that replace the status bar: keyword search and page jump.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::i18n;
use crate::tui::app::App;

/// Render the keyword input bar with the current result counter.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();

    let spans: Vec<Span<'static>> = vec![
        Span::styled(" /: ", theme.search_prompt),
        Span::styled(app.search_input.clone(), theme.header_bar),
        Span::styled("_", theme.search_prompt),
        Span::styled(
            format!(
                " ({} / {})   Enter:{}  Esc:{}",
                app.filtered.len(),
                app.archive.messages().len(),
                i18n::tui_hint_apply(),
                i18n::tui_hint_cancel()
            ),
            theme.help_dim,
        ),
    ];

    let bar = Paragraph::new(Line::from(spans)).style(theme.status_bar);
    frame.render_widget(bar, area);
}

/// Render the `:` page prompt with the page count.
pub fn render_page_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let typed = app.page_input.clone().unwrap_or_default();

    let spans: Vec<Span<'static>> = vec![
        Span::styled(format!(" {}: ", i18n::tui_goto_page()), theme.search_prompt),
        Span::styled(typed, theme.header_bar),
        Span::styled("_", theme.search_prompt),
        Span::styled(
            format!(
                " (1-{})   Enter:{}  Esc:{}",
                app.total_pages(),
                i18n::tui_hint_apply(),
                i18n::tui_hint_cancel()
            ),
            theme.help_dim,
        ),
    ];

    let bar = Paragraph::new(Line::from(spans)).style(theme.status_bar);
    frame.render_widget(bar, area);
}
