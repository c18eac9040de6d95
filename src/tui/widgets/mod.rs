//! TUI widgets for rendering different UI panels.

pub mod chat_view;
pub mod date_popup;
pub mod gallery_popup;
pub mod header_bar;
pub mod help_popup;
pub mod search_bar;
pub mod status_bar;
pub mod warnings_popup;

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Calculate a centered rectangle as a percentage of `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Calculate a centered rectangle with exact dimensions, clamped to screen.
pub(crate) fn centered_rect_exact(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Truncate `s` to `max_width` display columns, ending in `...` when cut.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return s.chars().take(max_width).collect();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width + 3 > max_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("...");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hola", 10), "hola");
        assert_eq!(truncate_str("Mañana nos vemos", 10), "Mañana ...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(60, 50, area);
        assert_eq!(r, Rect::new(20, 10, 60, 20));
        let r = centered_rect_exact(200, 10, area);
        assert_eq!(r.width, 100);
        assert_eq!(r.x, 0);
    }
}
