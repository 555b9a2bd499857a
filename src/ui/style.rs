//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's palette, except for the
//! accent and highlighted code, which carry exact RGB values.

use ratatui::style::{Color, Modifier, Style};

use crate::export::DEFAULT_ACCENT;
use crate::highlight::HighlightBackground;

/// Styles for the preview pane and the chrome around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub h1: Style,
    pub h2: Style,
    pub h3: Style,
    /// Levels 4 to 6
    pub h4: Style,
    pub code: Style,
    pub inline_code: Style,
    pub quote: Style,
    pub link: Style,
    pub emphasis: Style,
    pub strong: Style,
    pub strikethrough: Style,
    pub list_marker: Style,
    pub task_checked: Style,
    pub task_unchecked: Style,
    pub table_border: Style,
    pub image: Style,
    pub hr: Style,
    pub selection: Style,
    pub cursor: Style,
    pub gutter: Style,
    pub status_bg: Color,
    pub status_fg: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark(DEFAULT_ACCENT)
    }
}

impl Theme {
    pub fn for_background(mode: HighlightBackground, accent: &str) -> Self {
        match mode {
            HighlightBackground::Light => Self::light(accent),
            HighlightBackground::Dark => Self::dark(accent),
        }
    }

    /// Create a theme optimized for dark terminals.
    pub fn dark(accent: &str) -> Self {
        let accent = parse_css_color(accent).unwrap_or(Color::Green);
        Self {
            h1: Style::default()
                .fg(accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            h4: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(Color::Indexed(250)),
            inline_code: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Indexed(248))
                .add_modifier(Modifier::ITALIC),
            link: Style::default()
                .fg(accent)
                .add_modifier(Modifier::UNDERLINED),
            emphasis: Style::default().fg(accent).add_modifier(Modifier::ITALIC),
            strong: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            list_marker: Style::default().fg(Color::Yellow),
            task_checked: Style::default().fg(accent),
            task_unchecked: Style::default().fg(Color::Indexed(245)),
            table_border: Style::default().fg(Color::Indexed(240)),
            image: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
            hr: Style::default().fg(Color::Indexed(240)),
            selection: Style::default().bg(Color::Indexed(238)),
            cursor: Style::default().bg(Color::White).fg(Color::Black),
            gutter: Style::default().fg(Color::DarkGray),
            status_bg: Color::Indexed(236),
            status_fg: Color::Indexed(252),
            accent,
        }
    }

    /// Create a theme optimized for light terminals.
    pub fn light(accent: &str) -> Self {
        let accent = parse_css_color(accent).unwrap_or(Color::Indexed(28));
        Self {
            h1: Style::default()
                .fg(accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Indexed(31))
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Indexed(136))
                .add_modifier(Modifier::BOLD),
            h4: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(Color::Indexed(238)),
            inline_code: Style::default()
                .fg(Color::Indexed(124))
                .add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Indexed(240))
                .add_modifier(Modifier::ITALIC),
            link: Style::default()
                .fg(accent)
                .add_modifier(Modifier::UNDERLINED),
            emphasis: Style::default().fg(accent).add_modifier(Modifier::ITALIC),
            strong: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            list_marker: Style::default().fg(Color::Indexed(136)),
            task_checked: Style::default().fg(accent),
            task_unchecked: Style::default().fg(Color::Indexed(250)),
            table_border: Style::default().fg(Color::Indexed(245)),
            image: Style::default()
                .fg(Color::Indexed(133))
                .add_modifier(Modifier::ITALIC),
            hr: Style::default().fg(Color::Indexed(245)),
            selection: Style::default().bg(Color::Indexed(153)),
            cursor: Style::default().bg(Color::Black).fg(Color::White),
            gutter: Style::default().fg(Color::Indexed(245)),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(235),
            accent,
        }
    }

    pub const fn heading(&self, level: u8) -> Style {
        match level {
            1 => self.h1,
            2 => self.h2,
            3 => self.h3,
            _ => self.h4,
        }
    }
}

/// Parse a `#rgb` or `#rrggbb` CSS color.
pub fn parse_css_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#').filter(|hex| hex.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let mut rgb = [0_u8; 3];
            for (slot, idx) in rgb.iter_mut().zip(0..3) {
                let digit = channel(hex.get(idx..=idx)?)?;
                *slot = digit * 17;
            }
            Some(Color::Rgb(rgb[0], rgb[1], rgb[2]))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_color_long_and_short() {
        assert_eq!(parse_css_color("#35B378"), Some(Color::Rgb(0x35, 0xb3, 0x78)));
        assert_eq!(parse_css_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_css_color("red"), None);
        assert_eq!(parse_css_color("#12345"), None);
    }

    #[test]
    fn test_themes_use_accent_for_links() {
        let theme = Theme::light("#123456");
        assert_eq!(theme.link.fg, Some(Color::Rgb(0x12, 0x34, 0x56)));
        assert_eq!(theme.heading(1).fg, Some(Color::Rgb(0x12, 0x34, 0x56)));
    }

    #[test]
    fn test_invalid_accent_falls_back() {
        let theme = Theme::dark("not-a-color");
        assert_eq!(theme.accent, Color::Green);
    }
}
