//! Scrollbar rendering helper shared by the page and the logs panel

use crate::tui::scroll::ScrollState;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Visual style for the scrollbar
#[derive(Debug, Clone, Copy, Default)]
pub enum ScrollbarStyle {
    /// Arrows at top and bottom (↑ ↓)
    Arrows,
    /// No arrows, just the thumb
    #[default]
    Minimal,
}

/// Render a vertical scrollbar on the right edge of `area`
///
/// Draws nothing when the content fits.
pub fn render_scrollbar(
    f: &mut Frame,
    area: Rect,
    scroll: &ScrollState,
    style: ScrollbarStyle,
    thumb: Style,
) {
    if !scroll.overflows() {
        return;
    }

    let scrollbar = match style {
        ScrollbarStyle::Arrows => Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓")),
        ScrollbarStyle::Minimal => Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None),
    }
    .thumb_style(thumb);

    // ScrollbarState wants how far the content can scroll, not its length
    let mut state = ScrollbarState::new(scroll.max_offset()).position(scroll.offset());
    f.render_stateful_widget(scrollbar, area, &mut state);
}
