//! Date range popup with two editable fields.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect_exact;
use crate::i18n;
use crate::tui::app::{App, DateField};

/// Render the date range popup centered on screen.
pub fn render(frame: &mut Frame, app: &App) {
    let Some(input) = &app.date_input else {
        return;
    };
    let theme = app.theme();
    let area = centered_rect_exact(56, 9, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.popup_title)
        .title(i18n::tui_date_title())
        .style(theme.popup);

    let field = |label: &'static str, value: &str, active: bool| {
        let (marker, style) = if active {
            ("> ", theme.list_selected)
        } else {
            ("  ", theme.popup)
        };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!(" {marker}{label}"), theme.search_prompt),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    };

    let (min, max) = app.archive.date_bounds();
    let mut lines = vec![
        Line::from(Span::styled(format!("  {min} \u{2192} {max}"), theme.help_dim)),
        Line::from(""),
        field(
            i18n::tui_date_from(),
            &input.start,
            input.field == DateField::Start,
        ),
        field(i18n::tui_date_to(), &input.end, input.field == DateField::End),
        Line::from(""),
    ];
    match &input.error {
        Some(error) => lines.push(Line::from(Span::styled(format!("  {error}"), theme.error))),
        None => lines.push(Line::from(Span::styled(
            format!("  {}", i18n::tui_date_hint()),
            theme.help_dim,
        ))),
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
