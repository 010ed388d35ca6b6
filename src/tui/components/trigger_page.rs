//! Trigger page - the scrollable background the dialog opens over
//!
//! A banner with the "Fill in the application" button followed by three tall
//! colored blocks, so there is something to scroll (and to lock) behind the
//! dialog.

use super::scrollbar::{render_scrollbar, ScrollbarStyle};
use crate::modal::{Element, ElementKind, FocusState, Overflow, ScrollLockable};
use crate::tui::scroll::ScrollState;
use crate::tui::theme::Theme;
use crate::tui::traits::{Handled, Interactive};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub const PAGE_ID: &str = "page";
pub const HEADING_ID: &str = "page-heading";
pub const TRIGGER_ID: &str = "open-form";

const HEADING: &str = "Accessible Modal Form";
const SUBTITLE: &str = "Open the form, fill it in, and the page gets the answer back.";
const TRIGGER_LABEL: &str = "Fill in the application";

/// Rows per page section
const SECTION_ROWS: usize = 12;
/// Row of the trigger button within the banner
const TRIGGER_ROW: usize = 6;

#[derive(Clone, Copy)]
enum Tint {
    Red,
    Blue,
    Green,
}

impl Tint {
    fn color(self, theme: &Theme) -> Color {
        match self {
            Tint::Red => theme.block_red,
            Tint::Blue => theme.block_blue,
            Tint::Green => theme.block_green,
        }
    }
}

#[derive(Clone, Copy)]
enum Section {
    Banner,
    Block(&'static str, &'static str, Tint),
}

const SECTIONS: [Section; 4] = [
    Section::Banner,
    Section::Block("block-red", "Red Block 1", Tint::Red),
    Section::Block("block-blue", "Blue Block 2", Tint::Blue),
    Section::Block("block-green", "Green Block 3", Tint::Green),
];

pub struct TriggerPage {
    scroll: ScrollState,
    overflow: Overflow,
    /// Where the trigger landed in the last render
    trigger_rect: Option<Rect>,
}

impl TriggerPage {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::manual(),
            overflow: Overflow::Auto,
            trigger_rect: None,
        }
    }

    #[cfg(test)]
    pub fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    /// Page subtree: heading, subtitle, trigger and the three blocks
    pub fn element(&self) -> Element {
        let mut children = vec![
            Element::new(HEADING_ID, ElementKind::Heading).with_label(HEADING),
            Element::new("page-subtitle", ElementKind::Text).with_label(SUBTITLE),
            Element::button(TRIGGER_ID, TRIGGER_LABEL),
        ];
        for section in SECTIONS {
            if let Section::Block(id, label, _) = section {
                children.push(Element::new(id, ElementKind::Text).with_label(label));
            }
        }
        Element::region(PAGE_ID).with_children(children)
    }

    /// Mouse wheel; ignored while scrolling is locked
    pub fn scroll_wheel(&mut self, down: bool) -> bool {
        if self.overflow == Overflow::Hidden {
            return false;
        }
        self.scroll.scroll_by(if down { 3 } else { -3 });
        true
    }

    /// Programmatic scroll so the trigger is on screen (focus restore)
    pub fn scroll_trigger_into_view(&mut self) {
        let (start, end) = self.scroll.visible_range();
        if !(start..end).contains(&TRIGGER_ROW) {
            self.scroll.scroll_to_top();
        }
    }

    /// Whether a click at `(column, row)` hit the trigger button
    pub fn hits_trigger(&self, column: u16, row: u16) -> bool {
        self.trigger_rect
            .is_some_and(|rect| rect.contains(Position::new(column, row)))
    }

    fn lines(&self, theme: &Theme, focus: &FocusState) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(SECTIONS.len() * SECTION_ROWS);
        for section in SECTIONS {
            match section {
                Section::Banner => {
                    for row in 0..SECTION_ROWS {
                        let line = match row {
                            2 => Line::styled(
                                HEADING,
                                Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
                            ),
                            4 => Line::styled(SUBTITLE, Style::default().fg(theme.muted)),
                            TRIGGER_ROW => {
                                let style = if focus.is_focused_str(TRIGGER_ID) {
                                    theme.focus_style()
                                } else {
                                    Style::default()
                                        .fg(theme.highlight)
                                        .add_modifier(Modifier::BOLD)
                                };
                                Line::styled(format!("[ {TRIGGER_LABEL} ]"), style)
                            }
                            _ => Line::default(),
                        };
                        lines.push(line.centered());
                    }
                }
                Section::Block(_, label, tint) => {
                    let style = Style::default()
                        .bg(tint.color(theme))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD);
                    for row in 0..SECTION_ROWS {
                        let text = if row == SECTION_ROWS / 2 { label } else { "" };
                        lines.push(Line::styled(text, style).centered());
                    }
                }
            }
        }
        lines
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &FocusState) {
        let lines = self.lines(theme, focus);
        self.scroll
            .update_dimensions(lines.len(), usize::from(area.height));
        let offset = self.scroll.offset();

        self.trigger_rect = TRIGGER_ROW
            .checked_sub(offset)
            .filter(|&row| row < usize::from(area.height))
            .and_then(|row| u16::try_from(row).ok())
            .map(|row| {
                let width = u16::try_from(format!("[ {TRIGGER_LABEL} ]").width())
                    .unwrap_or(u16::MAX)
                    .min(area.width);
                let x = area.x + (area.width - width) / 2;
                Rect::new(x, area.y + row, width, 1)
            });

        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().bg(theme.background))
                .scroll((offset, 0)),
            area,
        );

        // Greyed out while the dialog holds the scroll lock
        let thumb = match self.overflow {
            Overflow::Auto => Style::default().fg(theme.highlight),
            Overflow::Hidden => Style::default().fg(theme.muted),
        };
        render_scrollbar(frame, area, &self.scroll, ScrollbarStyle::Arrows, thumb);
    }
}

impl Default for TriggerPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollLockable for TriggerPage {
    fn overflow(&self) -> Overflow {
        self.overflow
    }

    fn set_overflow(&mut self, overflow: Overflow) {
        self.overflow = overflow;
    }
}

impl Interactive for TriggerPage {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if key.kind == KeyEventKind::Release || self.overflow == Overflow::Hidden {
            return Handled::No;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll.scroll_down(),
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::PageDown => self.scroll.page_down(),
            KeyCode::Home => self.scroll.scroll_to_top(),
            KeyCode::End => self.scroll.scroll_to_bottom(),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("Tab:focus  Enter:open form  ↑↓:scroll")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::{scan, ScrollLock};
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn draw(page: &mut TriggerPage, focus: &FocusState, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(60, height)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|f| page.render(f, f.area(), &theme, focus))
            .unwrap();
    }

    #[test]
    fn trigger_is_the_only_focusable_element() {
        let page = TriggerPage::new();
        let bounds = scan(&page.element());
        assert_eq!(bounds.first.as_ref().map(|id| id.as_str()), Some(TRIGGER_ID));
        assert_eq!(bounds.first, bounds.last);
        assert_eq!(page.element().walk().len(), 7);
    }

    #[test]
    fn scroll_keys_move_until_locked() {
        let mut page = TriggerPage::new();
        draw(&mut page, &FocusState::new(), 20);

        assert_eq!(page.handle_key(key(KeyCode::Down)), Handled::Yes);
        assert_eq!(page.scroll_offset(), 1);

        let mut lock = ScrollLock::new();
        lock.lock(&mut page);
        assert_eq!(page.handle_key(key(KeyCode::Down)), Handled::No);
        assert!(!page.scroll_wheel(true));
        assert_eq!(page.scroll_offset(), 1);

        lock.unlock(&mut page);
        assert_eq!(page.overflow(), Overflow::Auto);
        assert!(page.scroll_wheel(true));
        assert_eq!(page.scroll_offset(), 4);
    }

    #[test]
    fn render_records_trigger_for_hit_testing() {
        let mut page = TriggerPage::new();
        draw(&mut page, &FocusState::new(), 20);

        // "[ Fill in the application ]" is 27 wide, centered in 60
        assert!(page.hits_trigger(16, 6));
        assert!(page.hits_trigger(42, 6));
        assert!(!page.hits_trigger(15, 6));
        assert!(!page.hits_trigger(20, 5));
    }

    #[test]
    fn trigger_scrolled_away_is_not_clickable_until_revealed() {
        let mut page = TriggerPage::new();
        draw(&mut page, &FocusState::new(), 20);
        page.handle_key(key(KeyCode::PageDown));
        draw(&mut page, &FocusState::new(), 20);
        assert!(!page.hits_trigger(20, 6));

        page.scroll_trigger_into_view();
        draw(&mut page, &FocusState::new(), 20);
        assert_eq!(page.scroll_offset(), 0);
        assert!(page.hits_trigger(20, 6));
    }
}
