// Scroll state shared by the trigger page and the logs panel
//
// Each component owns its ScrollState; App only routes input. The logs panel
// follows new entries, the page starts at the top and scrolls manually.

/// Position, content size and viewport size for one scrollable surface
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Row index at the top of the viewport
    offset: usize,

    /// Total rows of content
    total: usize,

    /// Rows visible in the viewport
    viewport: usize,

    /// Keep the view pinned to the bottom as content grows.
    /// Scrolling up disables it; reaching the bottom re-enables it.
    pub auto_follow: bool,

    /// False for manual surfaces, which never start following
    follows: bool,
}

impl ScrollState {
    /// Scroll state that follows new content
    pub fn new() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            auto_follow: true,
            follows: true,
        }
    }

    /// Scroll state that stays where the user put it
    pub fn manual() -> Self {
        Self {
            auto_follow: false,
            follows: false,
            ..Self::new()
        }
    }

    /// Update content and viewport dimensions; call each render
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;

        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_by(-1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_by(1);
    }

    /// Move by `delta` rows (negative is up)
    pub fn scroll_by(&mut self, delta: isize) {
        if delta < 0 {
            let before = self.offset;
            self.offset = self.offset.saturating_sub(delta.unsigned_abs());
            if self.offset != before {
                self.auto_follow = false;
            }
            return;
        }

        // Dimensions unknown until the first render; render clamps
        if self.total == 0 {
            self.offset += delta.unsigned_abs();
            return;
        }
        self.offset = (self.offset + delta.unsigned_abs()).min(self.max_offset());
        if self.offset >= self.max_offset() && self.follows {
            self.auto_follow = true;
        }
    }

    pub fn page_up(&mut self) {
        let page = self.viewport.max(1);
        self.scroll_by(-(page as isize));
    }

    pub fn page_down(&mut self) {
        let page = self.viewport.max(1);
        self.scroll_by(page as isize);
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.auto_follow = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.auto_follow = self.follows;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Visible row range `(start, end)`
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset;
        let end = (self.offset + self.viewport).min(self.total);
        (start, end)
    }

    /// Content taller than the viewport
    pub fn overflows(&self) -> bool {
        self.total > self.viewport
    }

    /// Largest offset that still fills the viewport
    pub fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}
