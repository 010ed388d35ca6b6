// Theme system for the TUI
//
// Two built-in palettes, selected by name from config (`theme = "dark"`).
// Every widget takes colors from here rather than hard-coding them.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Complete resolved theme
#[derive(Debug, Clone)]
pub struct Theme {
    // ─── Terminal Colors ─────────────────────────────────────
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    // ─── UI Element Colors ───────────────────────────────────
    pub border: Color,
    pub highlight: Color,
    pub title: Color,
    pub status_bar: Color,
    pub error: Color,
    pub success: Color,
    pub panel_logs: Color,

    // ─── Selection / Focus ───────────────────────────────────
    pub selection: Color,
    pub selection_fg: Color,

    // ─── Page Blocks ─────────────────────────────────────────
    pub block_red: Color,
    pub block_blue: Color,
    pub block_green: Color,

    // ─── Log Levels ──────────────────────────────────────────
    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
    pub log_trace: Color,

    pub border_type: BorderType,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Resolve a theme by name, falling back to dark for unknown names
    pub fn by_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            other => {
                tracing::warn!("Unknown theme '{}', using dark", other);
                Self::dark()
            }
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            highlight: Color::Cyan,
            title: Color::Cyan,
            status_bar: Color::Gray,
            error: Color::LightRed,
            success: Color::LightGreen,
            panel_logs: Color::Magenta,
            selection: Color::Cyan,
            selection_fg: Color::Black,
            block_red: Color::Red,
            block_blue: Color::Blue,
            block_green: Color::Green,
            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Green,
            log_debug: Color::Blue,
            log_trace: Color::DarkGray,
            border_type: BorderType::Rounded,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            border: Color::DarkGray,
            highlight: Color::Blue,
            title: Color::Blue,
            status_bar: Color::DarkGray,
            error: Color::Red,
            success: Color::Green,
            panel_logs: Color::Magenta,
            selection: Color::Blue,
            selection_fg: Color::White,
            block_red: Color::Rgb(185, 28, 28),
            block_blue: Color::Rgb(29, 78, 216),
            block_green: Color::Rgb(21, 128, 61),
            log_error: Color::Red,
            log_warn: Color::Rgb(161, 98, 7),
            log_info: Color::Green,
            log_debug: Color::Blue,
            log_trace: Color::Gray,
            border_type: BorderType::Plain,
        }
    }

    /// Style for the element that has keyboard focus
    pub fn focus_style(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Theme::by_name("LIGHT").background, Theme::light().background);
        assert_eq!(Theme::by_name("dark").background, Theme::dark().background);
    }

    #[test]
    fn unknown_name_falls_back_to_dark() {
        let theme = Theme::by_name("solarized");
        assert_eq!(theme.background, Color::Reset);
        assert_eq!(theme.border_type, BorderType::Rounded);
    }
}
