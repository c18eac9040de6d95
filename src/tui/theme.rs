//! Color theme definitions for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Which palette is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    /// Parse a config value; anything other than `light` is dark.
    pub fn from_config(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("light") {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// A complete color theme for the TUI.
pub struct Theme {
    pub header_bar: Style,
    pub status_bar: Style,
    pub list_selected: Style,
    pub list_header: Style,
    pub date_label: Style,
    pub bubble_left: Style,
    pub bubble_right: Style,
    pub sender: Style,
    pub timestamp: Style,
    pub reaction: Style,
    pub url: Style,
    pub search_highlight: Style,
    pub attachment: Style,
    pub border: Style,
    pub popup: Style,
    pub popup_title: Style,
    pub search_prompt: Style,
    pub error: Style,
    pub help_section: Style,
    pub help_dim: Style,
}

impl Theme {
    /// Build the palette for `name`.
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    /// Dark theme (default).
    pub fn dark() -> Self {
        Self {
            header_bar: Style::default()
                .fg(Color::Rgb(200, 200, 220))
                .bg(Color::Rgb(30, 30, 46)),
            status_bar: Style::default()
                .fg(Color::Rgb(150, 150, 170))
                .bg(Color::Rgb(30, 30, 46)),
            list_selected: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(60, 60, 100)),
            list_header: Style::default()
                .fg(Color::Rgb(180, 180, 200))
                .bg(Color::Rgb(40, 40, 60))
                .add_modifier(Modifier::BOLD),
            date_label: Style::default()
                .fg(Color::Rgb(150, 150, 170))
                .add_modifier(Modifier::ITALIC),
            bubble_left: Style::default()
                .fg(Color::Rgb(220, 220, 230))
                .bg(Color::Rgb(45, 45, 65)),
            bubble_right: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(30, 90, 160)),
            sender: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            timestamp: Style::default().fg(Color::Rgb(120, 120, 140)),
            reaction: Style::default().fg(Color::Rgb(255, 180, 120)),
            url: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            search_highlight: Style::default().fg(Color::Black).bg(Color::Yellow),
            attachment: Style::default().fg(Color::Green),
            border: Style::default().fg(Color::Rgb(80, 80, 100)),
            popup: Style::default()
                .fg(Color::Rgb(220, 220, 230))
                .bg(Color::Rgb(20, 20, 35)),
            popup_title: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            search_prompt: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Rgb(255, 110, 110)),
            help_section: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            help_dim: Style::default().fg(Color::Rgb(110, 110, 130)),
        }
    }

    /// Light theme for bright terminals.
    pub fn light() -> Self {
        Self {
            header_bar: Style::default()
                .fg(Color::Rgb(30, 30, 46))
                .bg(Color::Rgb(220, 222, 235)),
            status_bar: Style::default()
                .fg(Color::Rgb(70, 70, 90))
                .bg(Color::Rgb(220, 222, 235)),
            list_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(180, 200, 240)),
            list_header: Style::default()
                .fg(Color::Rgb(40, 40, 60))
                .bg(Color::Rgb(200, 205, 225))
                .add_modifier(Modifier::BOLD),
            date_label: Style::default()
                .fg(Color::Rgb(100, 100, 120))
                .add_modifier(Modifier::ITALIC),
            bubble_left: Style::default()
                .fg(Color::Rgb(20, 20, 30))
                .bg(Color::Rgb(230, 230, 236)),
            bubble_right: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0, 120, 255)),
            sender: Style::default()
                .fg(Color::Rgb(20, 70, 170))
                .add_modifier(Modifier::BOLD),
            timestamp: Style::default().fg(Color::Rgb(120, 120, 135)),
            reaction: Style::default().fg(Color::Rgb(190, 90, 20)),
            url: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            search_highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(255, 220, 80)),
            attachment: Style::default().fg(Color::Rgb(20, 130, 60)),
            border: Style::default().fg(Color::Rgb(160, 160, 180)),
            popup: Style::default()
                .fg(Color::Rgb(20, 20, 30))
                .bg(Color::Rgb(245, 245, 250)),
            popup_title: Style::default()
                .fg(Color::Rgb(20, 70, 170))
                .add_modifier(Modifier::BOLD),
            search_prompt: Style::default()
                .fg(Color::Rgb(170, 90, 0))
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Rgb(190, 30, 30)),
            help_section: Style::default()
                .fg(Color::Rgb(20, 70, 170))
                .add_modifier(Modifier::BOLD),
            help_dim: Style::default().fg(Color::Rgb(130, 130, 145)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_name_from_config() {
        assert_eq!(ThemeName::from_config("light"), ThemeName::Light);
        assert_eq!(ThemeName::from_config(" Light "), ThemeName::Light);
        assert_eq!(ThemeName::from_config("dark"), ThemeName::Dark);
        assert_eq!(ThemeName::from_config("solarized"), ThemeName::Dark);
    }

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(ThemeName::Dark.toggled(), ThemeName::Light);
        assert_eq!(ThemeName::Dark.toggled().toggled(), ThemeName::Dark);
    }
}
