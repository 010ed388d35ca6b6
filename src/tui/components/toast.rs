//! Toast notification component
//!
//! A non-blocking overlay in the bottom-right corner that reports how the
//! last decision settled. Dismisses itself after its duration.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const DEFAULT_DURATION: Duration = Duration::from_secs(3);

/// A toast notification that auto-dismisses
pub struct Toast {
    pub message: String,
    /// Errors get the error border instead of the highlight
    pub is_error: bool,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            created_at: now,
            duration: DEFAULT_DURATION,
        }
    }

    pub fn error(message: impl Into<String>, now: Instant) -> Self {
        Self {
            is_error: true,
            ..Self::new(message, now)
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }

    /// Render on top of everything, clearing what is underneath
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        // 2 cells of padding plus the border on each side
        let text_width = u16::try_from(self.message.width()).unwrap_or(u16::MAX);
        let width = text_width
            .saturating_add(4)
            .min(area.width.saturating_sub(4));
        let height = 3;

        let x = area.right().saturating_sub(width + 2);
        let y = area.bottom().saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height).intersection(area);

        let border = if self.is_error {
            theme.error
        } else {
            theme.success
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.background));

        let text = Paragraph::new(self.message.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.foreground))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_duration() {
        let start = Instant::now();
        let toast = Toast::new("Application submitted", start);
        assert!(!toast.is_expired(start + Duration::from_millis(2999)));
        assert!(toast.is_expired(start + DEFAULT_DURATION));
    }
}
