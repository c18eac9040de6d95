//! Help popup showing keyboard shortcuts in multi-column layout.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::{centered_rect_exact, truncate_str};
use crate::i18n;
use crate::tui::app::App;
use crate::tui::theme::Theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A single shortcut entry.
struct Shortcut {
    key: &'static str,
    desc: &'static str,
}

/// Render the help popup centered on screen with multi-column shortcuts.
pub fn render(frame: &mut Frame, app: &App) {
    let theme = app.theme();
    let screen = frame.area();

    let popup_width = (screen.width * 78 / 100).min(screen.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(2) as usize;

    let cols = if inner_width >= 90 {
        3
    } else if inner_width >= 56 {
        2
    } else {
        1
    };
    let col_width = inner_width / cols;
    let sep_width = inner_width.saturating_sub(2);

    let lines = build_lines(cols, col_width, sep_width, &theme);

    // lines + borders + a little bottom padding
    let popup_height = (lines.len() as u16 + 3).min(screen.height.saturating_sub(2));
    let area = centered_rect_exact(popup_width, popup_height, screen);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.popup_title)
        .title(i18n::tui_help_title())
        .style(theme.popup);

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines), inner);
}

fn build_lines(
    cols: usize,
    col_width: usize,
    sep_width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = vec![
        Line::from(vec![
            Span::styled(format!("  {}", i18n::app_name()), theme.popup_title),
            Span::styled(format!("  v{VERSION}"), theme.help_dim),
        ]),
        Line::from(Span::styled(
            format!("  {}", i18n::tui_help_description()),
            theme.help_dim,
        )),
        Line::from(""),
    ];

    let sections: [(&str, Vec<Shortcut>); 4] = [
        (
            i18n::tui_help_section_pages(),
            vec![
                Shortcut {
                    key: "n / \u{2192}",
                    desc: i18n::tui_help_next_page(),
                },
                Shortcut {
                    key: "p / \u{2190}",
                    desc: i18n::tui_help_prev_page(),
                },
                Shortcut {
                    key: "g / G",
                    desc: i18n::tui_help_first_last(),
                },
                Shortcut {
                    key: ":",
                    desc: i18n::tui_help_goto(),
                },
                Shortcut {
                    key: "j / k",
                    desc: i18n::tui_help_scroll(),
                },
            ],
        ),
        (
            i18n::tui_help_section_filters(),
            vec![
                Shortcut {
                    key: "/",
                    desc: i18n::tui_help_keyword(),
                },
                Shortcut {
                    key: "d",
                    desc: i18n::tui_help_dates(),
                },
                Shortcut {
                    key: "r",
                    desc: i18n::tui_help_reset(),
                },
            ],
        ),
        (
            i18n::tui_help_section_media(),
            vec![
                Shortcut {
                    key: "f",
                    desc: i18n::tui_help_photos(),
                },
                Shortcut {
                    key: "v",
                    desc: i18n::tui_help_videos(),
                },
                Shortcut {
                    key: "a",
                    desc: i18n::tui_help_audio(),
                },
            ],
        ),
        (
            i18n::tui_help_section_general(),
            vec![
                Shortcut {
                    key: "w",
                    desc: i18n::tui_help_warnings(),
                },
                Shortcut {
                    key: "t",
                    desc: i18n::tui_help_theme(),
                },
                Shortcut {
                    key: "?",
                    desc: i18n::tui_help_help(),
                },
                Shortcut {
                    key: "q",
                    desc: i18n::tui_help_quit(),
                },
            ],
        ),
    ];

    for (title, shortcuts) in &sections {
        add_section_header(&mut lines, title, theme, sep_width);
        add_shortcuts_columns(&mut lines, shortcuts, cols, col_width, theme);
        lines.push(Line::from(""));
    }

    let sep = "\u{2500}".repeat(sep_width);
    lines.push(Line::from(Span::styled(format!("  {sep}"), theme.help_dim)));
    lines.push(Line::from(Span::styled(
        format!("  {}", i18n::tui_help_close()),
        theme.help_dim,
    )));

    lines
}

/// Add a section header with a trailing separator line.
fn add_section_header(lines: &mut Vec<Line<'static>>, title: &str, theme: &Theme, width: usize) {
    let remaining = width.saturating_sub(UnicodeWidthStr::width(title) + 4);
    lines.push(Line::from(vec![
        Span::styled(format!("  {title} "), theme.help_section),
        Span::styled("\u{2500}".repeat(remaining), theme.help_dim),
    ]));
}

/// Lay out shortcuts in N columns per row.
fn add_shortcuts_columns(
    lines: &mut Vec<Line<'static>>,
    shortcuts: &[Shortcut],
    cols: usize,
    col_width: usize,
    theme: &Theme,
) {
    let key_w: usize = 8;

    for row in shortcuts.chunks(cols) {
        let mut spans: Vec<Span<'static>> = vec![Span::raw("  ")];
        for s in row {
            let desc = truncate_str(s.desc, col_width.saturating_sub(key_w + 3));
            let padding = col_width
                .saturating_sub(key_w + 1 + UnicodeWidthStr::width(desc.as_str()))
                .max(1);
            spans.push(Span::styled(
                format!("{:>width$}", s.key, width = key_w),
                theme.search_prompt,
            ));
            spans.push(Span::styled(format!(" {desc}"), theme.popup));
            spans.push(Span::raw(" ".repeat(padding)));
        }
        lines.push(Line::from(spans));
    }
}
