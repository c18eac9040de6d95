//! Bottom status bar showing transient messages or keyboard hints.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::i18n;
use crate::tui::app::App;

/// Version string shown at the right edge of the status bar.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the status bar at the bottom with hints and version.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();

    let version_text = format!("v{VERSION} ");
    let version_width = version_text.len() as u16;

    // Split: hints (flexible) | version (fixed)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(version_width)])
        .split(area);

    let content = if let Some((msg, _)) = &app.status_message {
        Line::from(Span::styled(format!(" {msg}"), theme.status_bar))
    } else {
        let mut spans = Vec::new();
        for (i, (key, desc)) in hints().iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", theme.status_bar));
            }
            spans.push(Span::styled(format!(" {key}"), theme.search_prompt));
            spans.push(Span::styled(format!(":{desc}"), theme.status_bar));
        }
        Line::from(spans)
    };

    let bar = Paragraph::new(content).style(theme.status_bar);
    frame.render_widget(bar, chunks[0]);

    let version = Paragraph::new(Line::from(Span::styled(version_text, theme.border)))
        .alignment(Alignment::Right)
        .style(theme.status_bar);
    frame.render_widget(version, chunks[1]);
}

/// Hint pairs (key, description) for the feed view.
fn hints() -> Vec<(&'static str, &'static str)> {
    vec![
        ("n/p", i18n::tui_hint_page()),
        ("j/k", i18n::tui_hint_scroll()),
        ("/", i18n::tui_hint_search()),
        ("d", i18n::tui_hint_dates()),
        ("f", i18n::tui_hint_photos()),
        ("v", i18n::tui_hint_videos()),
        ("a", i18n::tui_hint_audio()),
        ("w", i18n::tui_hint_warnings()),
        ("r", i18n::tui_hint_reset()),
        ("?", i18n::tui_hint_help()),
        ("q", i18n::tui_hint_quit()),
    ]
}
