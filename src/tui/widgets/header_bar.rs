//! Top header bar showing the archive name, result count and active filters.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::i18n;
use crate::tui::app::App;

/// Render the top header bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();

    let total = app.archive.messages().len();
    let visible = app.filtered.len();

    let mut spans = vec![
        Span::styled(format!(" {}", app.archive.name()), theme.header_bar),
        Span::styled(
            format!(" | {visible} / {total} {}", i18n::tui_messages()),
            theme.header_bar,
        ),
        Span::styled(
            format!(" | {} \u{2192} {}", app.query.start, app.query.end),
            theme.header_bar,
        ),
    ];

    if let Some(keyword) = app.query.active_keyword() {
        spans.push(Span::styled(
            format!(" | {}: \"{keyword}\"", i18n::tui_search()),
            theme.header_bar,
        ));
    }

    if !app.warnings.is_empty() {
        spans.push(Span::styled(
            format!(" | {} {}", app.warnings.len(), i18n::msg_warnings()),
            theme.header_bar.patch(theme.error),
        ));
    }

    // Right-aligned help hint
    let left_len: usize = spans
        .iter()
        .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
        .sum();
    let right_text = format!(" [?] {} ", i18n::tui_hint_help());
    let right_len = UnicodeWidthStr::width(right_text.as_str());
    let width = area.width as usize;
    if width > left_len + right_len {
        spans.push(Span::styled(
            " ".repeat(width - left_len - right_len),
            theme.header_bar,
        ));
    }
    spans.push(Span::styled(right_text, theme.header_bar));

    let bar = Paragraph::new(Line::from(spans)).style(theme.header_bar);
    frame.render_widget(bar, area);
}
