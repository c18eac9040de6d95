//! Conversation feed: day separators and left/right chat bubbles.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::feed::{self, AttachmentSummary, FeedItem, Side};
use crate::i18n;
use crate::search::keyword::KeywordMatcher;
use crate::tui::app::App;
use crate::tui::theme::Theme;

/// Bubbles take at most this share of the feed width.
const BUBBLE_PERCENT: usize = 70;
const MIN_BUBBLE_WIDTH: usize = 16;

/// Render the feed for the current page.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme();
    let title = format!(
        "{}{} {}/{} ",
        i18n::tui_chat_title(),
        i18n::tui_page(),
        app.page,
        app.total_pages()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.feed_viewport_height = inner.height as usize;

    let items = feed::build_feed(&app.page_messages(), &app.identity, i18n::lang());
    if items.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            i18n::msg_no_results(),
            theme.help_dim,
        )))
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let lines = feed_lines(
        &items,
        inner.width as usize,
        app.matcher.as_ref(),
        &app.time_format,
        &theme,
    );

    let max_scroll = lines.len().saturating_sub(inner.height as usize);
    app.feed_scroll = app.feed_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines).scroll((app.feed_scroll as u16, 0));
    frame.render_widget(paragraph, inner);
}

/// Lay out feed items as terminal lines for a feed `width` columns wide.
fn feed_lines(
    items: &[FeedItem],
    width: usize,
    matcher: Option<&KeywordMatcher>,
    time_format: &str,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let bubble_width = (width * BUBBLE_PERCENT / 100).max(MIN_BUBBLE_WIDTH).min(width);
    // one column of padding on each side of the text
    let text_width = bubble_width.saturating_sub(2).max(1);
    let mut lines = Vec::new();

    for item in items {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        match item {
            FeedItem::DateLabel { label, .. } => {
                lines.push(
                    Line::from(Span::styled(
                        format!("\u{2500}\u{2500} {label} \u{2500}\u{2500}"),
                        theme.date_label,
                    ))
                    .alignment(Alignment::Center),
                );
            }
            FeedItem::Bubble {
                side,
                sender,
                content,
                time,
                attachments,
                reactions,
                link,
            } => {
                let align = match side {
                    Side::Left => Alignment::Left,
                    Side::Right => Alignment::Right,
                };
                let fill = match side {
                    Side::Left => theme.bubble_left,
                    Side::Right => theme.bubble_right,
                };

                lines.push(
                    Line::from(vec![
                        Span::styled(sender.clone(), theme.sender),
                        Span::styled(
                            format!("  {}", time.format(time_format)),
                            theme.timestamp,
                        ),
                    ])
                    .alignment(align),
                );

                let wrapped = if content.trim().is_empty() {
                    Vec::new()
                } else {
                    feed::wrap_text(content, text_width)
                };
                let body_width = wrapped
                    .iter()
                    .map(|l| UnicodeWidthStr::width(l.as_str()))
                    .max()
                    .unwrap_or(0);
                for row in &wrapped {
                    let pad = body_width - UnicodeWidthStr::width(row.as_str());
                    let mut spans = vec![Span::styled(" ", fill)];
                    spans.extend(highlight(row, matcher, fill, theme.search_highlight));
                    spans.push(Span::styled(format!("{} ", " ".repeat(pad)), fill));
                    lines.push(Line::from(spans).alignment(align));
                }

                if !attachments.is_empty() {
                    lines.push(
                        Line::from(Span::styled(
                            attachment_summary(attachments),
                            theme.attachment,
                        ))
                        .alignment(align),
                    );
                } else if wrapped.is_empty() && link.is_none() {
                    lines.push(
                        Line::from(Span::styled(i18n::tui_no_text(), theme.help_dim))
                            .alignment(align),
                    );
                }
                if let Some(link) = link {
                    lines.push(Line::from(Span::styled(link.clone(), theme.url)).alignment(align));
                }
                if !reactions.is_empty() {
                    lines.push(
                        Line::from(Span::styled(reactions.join("  "), theme.reaction))
                            .alignment(align),
                    );
                }
            }
        }
    }

    lines
}

/// `[2 Photos] [1 Videos]` style summary.
fn attachment_summary(summary: &AttachmentSummary) -> String {
    [
        (summary.photos, i18n::msg_photos()),
        (summary.videos, i18n::msg_videos()),
        (summary.audio, i18n::msg_audio()),
    ]
    .iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, name)| format!("[{count} {name}]"))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Split `text` into spans, styling keyword matches with `hit`.
fn highlight(
    text: &str,
    matcher: Option<&KeywordMatcher>,
    base: Style,
    hit: Style,
) -> Vec<Span<'static>> {
    let Some(matcher) = matcher else {
        return vec![Span::styled(text.to_string(), base)];
    };
    let mut spans = Vec::new();
    let mut cursor = 0;
    for (start, end) in matcher.find_ranges(text) {
        if start > cursor {
            spans.push(Span::styled(text[cursor..start].to_string(), base));
        }
        spans.push(Span::styled(text[start..end].to_string(), hit));
        cursor = end;
    }
    if cursor < text.len() {
        spans.push(Span::styled(text[cursor..].to_string(), base));
    }
    spans
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_highlight_splits_matches() {
        let matcher = KeywordMatcher::new("cat").unwrap();
        let spans = highlight(
            "a cat and a Cat",
            Some(&matcher),
            Style::default(),
            Style::default(),
        );
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["a ", "cat", " and a ", "Cat"]);
    }

    #[test]
    fn test_feed_lines_alignment() {
        let time = NaiveDate::from_ymd_opt(2024, 2, 5)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        let items = vec![
            FeedItem::DateLabel {
                date: time.date(),
                label: "Monday, February 5, 2024".to_string(),
            },
            FeedItem::Bubble {
                side: Side::Right,
                sender: "Felipe".to_string(),
                content: "hola".to_string(),
                time,
                attachments: AttachmentSummary::default(),
                reactions: Vec::new(),
                link: None,
            },
        ];
        let lines = feed_lines(&items, 40, None, "%H:%M", &Theme::dark());
        assert_eq!(lines[0].alignment, Some(Alignment::Center));
        // blank separator, then header and body on the right
        assert_eq!(lines[2].alignment, Some(Alignment::Right));
        let header: String = lines[2].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(header, "Felipe  14:05");
        let body: String = lines[3].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(body, " hola ");
    }
}
