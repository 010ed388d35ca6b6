/// Responsive breakpoints and text fitting for TUI layout decisions.
///
/// Single source of truth for width thresholds - no magic numbers scattered in render code.
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// < 60 cols: the dialog takes nearly the whole width
    Compact,
    /// 60-99 cols: Half-screen
    Normal,
    /// 100+ cols: Full terminal
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            _ => Breakpoint::Wide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        self.ordinal() >= min.ordinal()
    }

    fn ordinal(&self) -> u8 {
        match self {
            Breakpoint::Compact => 0,
            Breakpoint::Normal => 1,
            Breakpoint::Wide => 2,
        }
    }
}

/// Rows a word-wrapped paragraph occupies at `width` columns
pub fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut lines = 1usize;
    let mut current = 0usize;
    for word in text.split_whitespace() {
        let w = word.width();
        if current == 0 {
            current = w;
        } else if current + 1 + w <= width {
            current += 1 + w;
        } else {
            lines += 1;
            current = w;
        }
        // Words wider than the line wrap mid-word
        while current > width {
            lines += 1;
            current -= width;
        }
    }
    u16::try_from(lines).unwrap_or(u16::MAX)
}

/// Keep the end of `text` that fits in `width` columns
///
/// Text inputs scroll horizontally: the caret is always at the end, so the
/// tail is what must stay visible. Uses display width, not byte length.
pub fn fit_tail(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut current_width = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > width {
            break;
        }
        current_width += char_width;
        start = i;
    }
    &text[start..]
}
