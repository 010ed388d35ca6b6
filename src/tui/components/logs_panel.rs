//! Logs panel component
//!
//! Shows what the `TuiLogLayer` captured: focus moves, lifecycle phases and
//! decisions. Toggled with F2; scrolled with Shift+↑/↓ so plain arrows keep
//! going to the page.
//!
//! The panel owns its scroll state and receives entries each frame rather
//! than holding the shared `LogBuffer`.

use super::scrollbar::{render_scrollbar, ScrollbarStyle};
use crate::logging::{LogEntry, LogLevel};
use crate::tui::scroll::ScrollState;
use crate::tui::theme::Theme;
use crate::tui::traits::{Handled, Interactive};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub struct LogsPanel {
    /// Follows new entries until the user scrolls up
    scroll: ScrollState,
}

impl LogsPanel {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::new(),
        }
    }

    /// Sync dimensions with the current buffer contents (call each frame)
    pub fn sync_entries(&mut self, entries: &[LogEntry], viewport_height: usize) {
        self.scroll
            .update_dimensions(entries.len(), viewport_height);
    }

    #[cfg(test)]
    pub fn is_following(&self) -> bool {
        self.scroll.auto_follow
    }

    pub fn render_with_entries(
        &self,
        f: &mut Frame,
        area: Rect,
        entries: &[LogEntry],
        theme: &Theme,
    ) {
        let (start, end) = self.scroll.visible_range();
        let items: Vec<ListItem> = entries
            .iter()
            .skip(start)
            .take(end - start)
            .map(|entry| {
                ListItem::new(format_log_entry(entry)).style(log_level_style(&entry.level, theme))
            })
            .collect();

        let title = if self.scroll.auto_follow {
            " System Logs "
        } else {
            " System Logs [scroll] "
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.panel_logs))
                .title(title),
        );
        f.render_widget(list, area);

        render_scrollbar(
            f,
            area,
            &self.scroll,
            ScrollbarStyle::Minimal,
            Style::default().fg(theme.panel_logs),
        );
    }
}

impl Default for LogsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Interactive for LogsPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if key.kind == KeyEventKind::Release || !key.modifiers.contains(KeyModifiers::SHIFT) {
            return Handled::No;
        }
        match key.code {
            KeyCode::Up => self.scroll.scroll_up(),
            KeyCode::Down => self.scroll.scroll_down(),
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::PageDown => self.scroll.page_down(),
            KeyCode::End => self.scroll.scroll_to_bottom(),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("Shift+↑↓:logs")
    }
}

fn format_log_entry(entry: &LogEntry) -> String {
    let source = entry
        .target
        .strip_prefix("modal_form::")
        .unwrap_or(&entry.target);
    format!(
        "[{}] {:5} {}: {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        source,
        entry.message
    )
}

fn log_level_style(level: &LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default()
            .fg(theme.log_error)
            .add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(theme.log_warn),
        LogLevel::Info => Style::default().fg(theme.log_info),
        LogLevel::Debug => Style::default().fg(theme.log_debug),
        LogLevel::Trace => Style::default().fg(theme.log_trace),
    }
}
