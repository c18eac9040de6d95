//! Media gallery popup: one row per resolved photo, video or voice note.

use ratatui::layout::Constraint;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Row, Table};
use ratatui::Frame;

use super::{centered_rect, truncate_str};
use crate::i18n;
use crate::model::attachment::MediaKind;
use crate::tui::app::App;

/// Render the gallery popup centered on screen.
pub fn render(frame: &mut Frame, app: &App) {
    let Some(view) = &app.gallery else {
        return;
    };
    let theme = app.theme();
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    let name = match view.kind {
        MediaKind::Photos => i18n::tui_photos_title(),
        MediaKind::Videos => i18n::tui_videos_title(),
        MediaKind::Audio => i18n::tui_audio_title(),
    };
    let mut title = format!("{name}({}) ", view.items.len());
    if view.missing > 0 {
        title.push_str(&format!("\u{b7} {} {} ", view.missing, i18n::msg_missing()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.popup_title)
        .title(title)
        .title_bottom(Line::from(Span::styled(
            format!(" {} ", i18n::tui_gallery_hint()),
            theme.help_dim,
        )))
        .style(theme.popup);

    if view.items.is_empty() {
        let rows = vec![Row::new(vec![
            Cell::from(i18n::msg_no_media()).style(theme.help_dim)
        ])];
        let table = Table::new(rows, [Constraint::Min(30)]).block(block);
        frame.render_widget(table, area);
        return;
    }

    let visible = area.height.saturating_sub(2).max(1) as usize;
    let first = view.selected.saturating_sub(visible - 1);
    let name_width = (area.width as usize).saturating_sub(44).max(12);

    let rows: Vec<Row> = view
        .items
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, item)| {
            let selected = i == view.selected;
            let marker = if selected { ">" } else { " " };
            let style = if selected {
                theme.list_selected
            } else {
                theme.popup
            };
            let name_style = if selected {
                theme.list_selected
            } else {
                theme.attachment
            };
            Row::new(vec![
                Cell::from(marker).style(style),
                Cell::from(item.datetime.format("%Y-%m-%d %H:%M").to_string()).style(style),
                Cell::from(truncate_str(app.identity.canonical(&item.sender), 14)).style(style),
                Cell::from(truncate_str(&item.file_name, name_width)).style(name_style),
                Cell::from(humansize::format_size(item.size_bytes, humansize::BINARY))
                    .style(style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Min(12),
            Constraint::Length(10),
        ],
    )
    .block(block)
    .column_spacing(1);

    frame.render_widget(table, area);
}
