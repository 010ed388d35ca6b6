//! Dialog - the accessible overlay
//!
//! Composes the animation lifecycle, focus trap, scroll lock and escape
//! binding around a pluggable [`DialogBody`]. The owner calls, once per loop
//! turn:
//!
//! 1. [`Dialog::update`] with the current open intent and `Instant::now()`
//! 2. [`Dialog::render`] inside `terminal.draw`
//! 3. [`Dialog::on_frame`] after the draw completed
//!
//! Key and mouse events go through [`Dialog::handle_key`] and
//! [`Dialog::handle_mouse`] before anything else on the page sees them.

use super::animation::AnimationLifecycle;
use super::announcer::Announcer;
use super::element::{Element, ElementId, ElementKind, Live, Role};
use super::escape::{EscapeBinding, KeyEventSource};
use super::focus::{tab_direction, FocusState, FocusTrap};
use super::scroll_lock::{ScrollLock, ScrollLockable};
use super::timer::Timer;
use super::Callback;
use crate::tui::layout::wrapped_height;
use crate::tui::theme::Theme;
use crate::tui::traits::Handled;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::rc::Rc;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

pub const OVERLAY_ID: &str = "modal-overlay";
pub const CONTENT_ID: &str = "modal-content";
pub const TITLE_ID: &str = "modal-title";
pub const DESCRIPTION_ID: &str = "modal-description";
pub const CLOSE_ID: &str = "modal-close";
pub const BODY_ID: &str = "modal-body";

/// Content box width cap (a `max-w-md` panel)
const MAX_WIDTH: u16 = 56;
const CLOSE_LABEL: &str = "[x]";

/// Callbacks the body uses to finish the interaction
pub struct BodyCallbacks<T> {
    pub on_submit: Rc<dyn Fn(T)>,
    pub on_cancel: Callback,
}

impl<T> Clone for BodyCallbacks<T> {
    fn clone(&self) -> Self {
        Self {
            on_submit: self.on_submit.clone(),
            on_cancel: self.on_cancel.clone(),
        }
    }
}

/// What a body needs to draw itself
pub struct BodyRenderContext<'a> {
    pub focus: &'a FocusState,
    pub theme: &'a Theme,
}

/// Content rendered inside the dialog
///
/// The dialog never looks inside the body's data; it only needs the live
/// element subtree for focus handling and the two callbacks for resolution.
pub trait DialogBody {
    /// Value handed to `on_submit`
    type Output;

    /// Live element subtree, recomputed on every event
    fn elements(&self) -> Vec<Element>;

    /// Handle a key while the dialog is open and focus routing reached the body
    fn handle_key(
        &mut self,
        key: &KeyEvent,
        focus: &mut FocusState,
        callbacks: &BodyCallbacks<Self::Output>,
    ) -> Handled;

    /// Pointer activation of one of the body's elements (already focused)
    fn activate(
        &mut self,
        _id: &ElementId,
        _focus: &mut FocusState,
        _callbacks: &BodyCallbacks<Self::Output>,
    ) -> Handled {
        Handled::No
    }

    /// Rows needed at the given width
    fn height(&self, width: u16) -> u16;

    /// Draw into `area`; returns hit regions for pointer routing
    fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        ctx: &BodyRenderContext<'_>,
    ) -> Vec<(ElementId, Rect)>;

    /// Pending assertive announcement (alert region content), if any
    fn take_announcement(&mut self) -> Option<String> {
        None
    }

    /// Fresh state; called every time the dialog opens
    fn reset(&mut self);
}

#[derive(Debug, Clone)]
pub struct DialogOptions {
    pub title: String,
    pub description: Option<String>,
    /// Delay before the heading takes focus
    pub focus_delay: Duration,
    /// Exit transition length; unmount waits this long
    pub exit_delay: Duration,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            title: "Application form".to_string(),
            description: Some(
                "Please enter your email, years of FE experience and a few other details."
                    .to_string(),
            ),
            focus_delay: Duration::from_millis(100),
            exit_delay: Duration::from_millis(300),
        }
    }
}

/// The dialog's external collaborators for one update
pub struct DialogEnv<'a, K, S> {
    pub keys: &'a mut K,
    pub page: &'a mut S,
    pub focus: &'a mut FocusState,
    pub announcer: &'a mut Announcer,
}

#[derive(Debug, Default)]
struct HitMap {
    content: Option<Rect>,
    elements: Vec<(ElementId, Rect)>,
}

#[derive(Debug, PartialEq, Eq)]
enum Hit {
    Backdrop,
    Content,
    Element(ElementId),
}

pub struct Dialog {
    options: DialogOptions,
    on_close: Callback,
    open: bool,
    lifecycle: AnimationLifecycle,
    trap: FocusTrap,
    scroll_lock: ScrollLock,
    escape: EscapeBinding,
    focus_timer: Timer,
    hits: HitMap,
}

impl Dialog {
    pub fn new(options: DialogOptions, on_close: Callback) -> Self {
        let lifecycle = AnimationLifecycle::new(options.exit_delay);
        Self {
            options,
            on_close,
            open: false,
            lifecycle,
            trap: FocusTrap::new(false),
            scroll_lock: ScrollLock::new(),
            escape: EscapeBinding::new(),
            focus_timer: Timer::new(),
            hits: HitMap::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    #[cfg(test)]
    pub fn phase(&self) -> super::animation::AnimationPhase {
        self.lifecycle.phase()
    }

    #[allow(dead_code)]
    pub fn is_trap_active(&self) -> bool {
        self.trap.is_active()
    }

    #[allow(dead_code)]
    pub fn is_escape_bound(&self) -> bool {
        self.escape.is_bound()
    }

    /// Text read out when the heading takes focus
    pub fn heading_announcement(&self) -> String {
        match &self.options.description {
            Some(description) => format!("Dialog: {}. {}", self.options.title, description),
            None => format!("Dialog: {}.", self.options.title),
        }
    }

    /// Feed the open intent and advance timers
    pub fn update<B, K, S>(&mut self, open: bool, now: Instant, body: &mut B, env: DialogEnv<'_, K, S>)
    where
        B: DialogBody,
        K: KeyEventSource,
        S: ScrollLockable,
    {
        let changed = open != self.open;
        if changed {
            self.open = open;
            if open {
                body.reset();
                self.focus_timer.schedule(now, self.options.focus_delay);
                tracing::info!("dialog opened: {}", self.options.title);
            } else {
                // A focus move scheduled for this opening must not land after close
                self.focus_timer.cancel();
                tracing::info!("dialog closed: {}", self.options.title);
            }
        }

        self.lifecycle.set_intent(open, now);
        self.trap.set_active(open);
        self.escape.sync(open, env.keys, &self.on_close);

        // Timers armed by this call fire on a later update, even at zero delay
        if !changed {
            self.lifecycle.tick(now);
            if self.focus_timer.fire(now) && self.lifecycle.is_mounted() {
                env.focus.focus(TITLE_ID);
                env.announcer
                    .announce(self.heading_announcement(), Live::Polite);
            }
        }

        if self.lifecycle.is_mounted() {
            self.scroll_lock.lock(env.page);
        } else {
            self.scroll_lock.unlock(env.page);
            self.hits = HitMap::default();
        }
    }

    /// A frame was drawn; lets a freshly mounted dialog enter
    pub fn on_frame(&mut self) -> bool {
        self.lifecycle.on_frame()
    }

    /// Release every listener and lock regardless of phase
    pub fn teardown<K: KeyEventSource, S: ScrollLockable>(&mut self, keys: &mut K, page: &mut S) {
        self.focus_timer.cancel();
        self.escape.teardown(keys);
        self.scroll_lock.unlock(page);
        self.trap.set_active(false);
        self.hits = HitMap::default();
    }

    /// Element subtree while mounted
    pub fn element<B: DialogBody>(&self, body: &B) -> Option<Element> {
        if !self.lifecycle.is_mounted() {
            return None;
        }

        let mut content = vec![Element::new(TITLE_ID, ElementKind::Heading)
            .with_tab_index(-1)
            .with_label(self.options.title.as_str())];
        if let Some(description) = &self.options.description {
            content.push(
                Element::new(DESCRIPTION_ID, ElementKind::Text).with_label(description.as_str()),
            );
        }
        content.push(Element::button(CLOSE_ID, "Close dialog"));
        content.push(
            Element::region(BODY_ID)
                .with_role(Role::Main)
                .with_label("Form content")
                .with_children(body.elements()),
        );

        let described_by = self
            .options
            .description
            .as_ref()
            .map(|_| ElementId::from(DESCRIPTION_ID));

        Some(
            Element::region(OVERLAY_ID)
                .with_role(Role::Dialog)
                .labelled_by(TITLE_ID)
                .described_by(described_by)
                .with_children(vec![Element::region(CONTENT_ID)
                    .with_role(Role::Document)
                    .with_children(content)]),
        )
    }

    /// Route a key event while open
    ///
    /// Returns `Handled::Yes` for everything while open: the page behind a
    /// modal dialog never sees keys.
    pub fn handle_key<B: DialogBody>(
        &mut self,
        key: &KeyEvent,
        focus: &mut FocusState,
        body: &mut B,
        callbacks: &BodyCallbacks<B::Output>,
        announcer: &mut Announcer,
    ) -> Handled {
        if !self.open {
            return Handled::No;
        }
        let Some(overlay) = self.element(body) else {
            return Handled::No;
        };
        if key.kind == KeyEventKind::Release {
            return Handled::Yes;
        }

        if let Some(content) = overlay.find(&CONTENT_ID.into()) {
            if self.trap.handle_key(key, content, focus) == Handled::Yes {
                return Handled::Yes;
            }
        }

        if let Some(direction) = tab_direction(key) {
            // The page behind the overlay is inert, so default navigation
            // only walks the dialog subtree
            focus.advance(&overlay, direction);
            return Handled::Yes;
        }

        if focus.is_focused_str(CLOSE_ID) && matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
        {
            (self.on_close)();
            return Handled::Yes;
        }

        body.handle_key(key, focus, callbacks);
        if let Some(message) = body.take_announcement() {
            announcer.announce(message, Live::Assertive);
        }
        Handled::Yes
    }

    /// Route a mouse event while mounted
    ///
    /// A left press on the backdrop closes; anything inside the content box
    /// stops there and focuses the element under the pointer, if any.
    pub fn handle_mouse<B: DialogBody>(
        &mut self,
        mouse: &MouseEvent,
        focus: &mut FocusState,
        body: &mut B,
        callbacks: &BodyCallbacks<B::Output>,
    ) -> Handled {
        if !self.lifecycle.is_mounted() {
            return Handled::No;
        }
        // Overlay covers the whole page; nothing passes through
        if !self.open || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Handled::Yes;
        }

        match self.hit_test(Position::new(mouse.column, mouse.row)) {
            Hit::Backdrop => {
                tracing::debug!(target: "modal_form::dialog", "backdrop click");
                (self.on_close)();
            }
            Hit::Content => {}
            Hit::Element(id) if id.as_str() == CLOSE_ID => (self.on_close)(),
            Hit::Element(id) => {
                let accepts = self
                    .element(body)
                    .and_then(|tree| tree.find(&id).map(|e| e.accepts_focus()))
                    .unwrap_or(false);
                if accepts {
                    focus.focus(id.clone());
                    body.activate(&id, focus, callbacks);
                }
            }
        }
        Handled::Yes
    }

    fn hit_test(&self, position: Position) -> Hit {
        let Some(content) = self.hits.content else {
            // Not drawn yet: nothing on screen to hit
            return Hit::Content;
        };
        if !content.contains(position) {
            return Hit::Backdrop;
        }
        self.hits
            .elements
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(position))
            .map(|(id, _)| Hit::Element(id.clone()))
            .unwrap_or(Hit::Content)
    }

    /// Draw the backdrop and content box over whatever the page drew
    pub fn render<B: DialogBody>(
        &mut self,
        frame: &mut Frame,
        body: &B,
        focus: &FocusState,
        theme: &Theme,
    ) {
        if !self.lifecycle.is_mounted() {
            self.hits = HitMap::default();
            return;
        }
        let area = frame.area();
        let entered = self.lifecycle.is_entered();

        // Backdrop: dim the page
        frame.buffer_mut().set_style(
            area,
            Style::default().fg(theme.muted).add_modifier(Modifier::DIM),
        );

        let width = MAX_WIDTH.min(area.width.saturating_sub(4));
        // Border plus one column of padding on each side
        let text_width = width.saturating_sub(4);
        let description_height = self
            .options
            .description
            .as_deref()
            .map(|d| wrapped_height(d, text_width))
            .unwrap_or(0);
        let wanted = 2 + 1 + description_height + 1 + body.height(text_width);
        let max_height = u16::try_from(u32::from(area.height) * 9 / 10).unwrap_or(u16::MAX);
        let height = wanted.min(max_height);
        let content = centered_rect(width, height, area);

        let border_style = if entered {
            Style::default().fg(theme.highlight)
        } else {
            Style::default().fg(theme.muted)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(border_style)
            .style(Style::default().bg(theme.background).fg(theme.foreground));
        let inner = block.inner(content);
        let inner = Rect {
            x: inner.x.saturating_add(1),
            width: inner.width.saturating_sub(2),
            ..inner
        };

        frame.render_widget(Clear, content);
        frame.render_widget(block, content);

        // Heading row: title left, close affordance right
        let close_width = CLOSE_LABEL.width() as u16;
        let close_rect = Rect::new(
            inner.right().saturating_sub(close_width),
            inner.y,
            close_width.min(inner.width),
            1u16.min(inner.height),
        );
        let title_rect = Rect::new(
            inner.x,
            inner.y,
            inner.width.saturating_sub(close_width + 1),
            1u16.min(inner.height),
        );
        let title_style = if focus.is_focused_str(TITLE_ID) {
            theme.focus_style()
        } else {
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD)
        };
        let close_style = if focus.is_focused_str(CLOSE_ID) {
            theme.focus_style()
        } else {
            Style::default().fg(theme.muted)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(self.options.title.as_str(), title_style)),
            title_rect,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(CLOSE_LABEL, close_style)),
            close_rect,
        );

        let mut y = inner.y.saturating_add(1);
        if let Some(description) = &self.options.description {
            let rect = Rect::new(inner.x, y, inner.width, description_height).intersection(inner);
            frame.render_widget(
                Paragraph::new(description.as_str())
                    .style(Style::default().fg(theme.muted))
                    .wrap(Wrap { trim: true }),
                rect,
            );
            y = y.saturating_add(description_height);
        }
        y = y.saturating_add(1);

        let body_area = Rect::new(
            inner.x,
            y,
            inner.width,
            inner.bottom().saturating_sub(y),
        )
        .intersection(inner);
        let ctx = BodyRenderContext { focus, theme };
        let mut elements = vec![
            (ElementId::from(TITLE_ID), title_rect),
            (ElementId::from(CLOSE_ID), close_rect),
        ];
        elements.extend(body.render(frame, body_area, &ctx));

        if !entered {
            frame
                .buffer_mut()
                .set_style(content, Style::default().add_modifier(Modifier::DIM));
        }

        self.hits = HitMap {
            content: Some(content),
            elements,
        };
    }
}

/// Calculate centered rect for the content box
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::animation::AnimationPhase;
    use crate::modal::escape::KeyListeners;
    use crate::modal::scroll_lock::Overflow;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use std::cell::{Cell, RefCell};

    const FOCUS: Duration = Duration::from_millis(100);
    const EXIT: Duration = Duration::from_millis(300);

    /// Two-element body: input "a", button "b" (submits "done")
    #[derive(Default)]
    struct TestBody {
        resets: usize,
        typed: String,
        pending_alert: Option<String>,
    }

    impl DialogBody for TestBody {
        type Output = String;

        fn elements(&self) -> Vec<Element> {
            vec![Element::input("a"), Element::button("b", "Send")]
        }

        fn handle_key(
            &mut self,
            key: &KeyEvent,
            focus: &mut FocusState,
            callbacks: &BodyCallbacks<String>,
        ) -> Handled {
            match key.code {
                KeyCode::Enter if focus.is_focused_str("b") => {
                    if self.typed.is_empty() {
                        self.pending_alert = Some("Text required.".to_string());
                    } else {
                        (callbacks.on_submit)(self.typed.clone());
                    }
                    Handled::Yes
                }
                KeyCode::Char(c) if focus.is_focused_str("a") => {
                    self.typed.push(c);
                    Handled::Yes
                }
                _ => Handled::No,
            }
        }

        fn height(&self, _width: u16) -> u16 {
            2
        }

        fn render(
            &self,
            _frame: &mut Frame,
            area: Rect,
            _ctx: &BodyRenderContext<'_>,
        ) -> Vec<(ElementId, Rect)> {
            vec![
                ("a".into(), Rect::new(area.x, area.y, area.width, 1)),
                ("b".into(), Rect::new(area.x, area.y + 1, area.width, 1)),
            ]
        }

        fn take_announcement(&mut self) -> Option<String> {
            self.pending_alert.take()
        }

        fn reset(&mut self) {
            self.resets += 1;
            self.typed.clear();
        }
    }

    #[derive(Default)]
    struct Page {
        overflow: Overflow,
    }

    impl ScrollLockable for Page {
        fn overflow(&self) -> Overflow {
            self.overflow
        }
        fn set_overflow(&mut self, overflow: Overflow) {
            self.overflow = overflow;
        }
    }

    struct Harness {
        dialog: Dialog,
        body: TestBody,
        keys: KeyListeners,
        page: Page,
        focus: FocusState,
        announcer: Announcer,
        closes: Rc<Cell<usize>>,
        submitted: Rc<RefCell<Vec<String>>>,
        callbacks: BodyCallbacks<String>,
    }

    impl Harness {
        fn new(description: Option<&str>) -> Self {
            Self::with_delays(description, FOCUS, EXIT)
        }

        fn with_delays(
            description: Option<&str>,
            focus_delay: Duration,
            exit_delay: Duration,
        ) -> Self {
            let closes = Rc::new(Cell::new(0));
            let submitted = Rc::new(RefCell::new(Vec::new()));
            let on_close: Callback = {
                let closes = closes.clone();
                Rc::new(move || closes.set(closes.get() + 1))
            };
            let callbacks = BodyCallbacks {
                on_submit: {
                    let submitted = submitted.clone();
                    Rc::new(move |v: String| submitted.borrow_mut().push(v))
                },
                on_cancel: on_close.clone(),
            };
            let options = DialogOptions {
                title: "Apply".to_string(),
                description: description.map(str::to_string),
                focus_delay,
                exit_delay,
            };
            let mut focus = FocusState::new();
            focus.focus("open-form");
            Self {
                dialog: Dialog::new(options, on_close),
                body: TestBody::default(),
                keys: KeyListeners::new(),
                page: Page::default(),
                focus,
                announcer: Announcer::new(),
                closes,
                submitted,
                callbacks,
            }
        }

        fn update(&mut self, open: bool, now: Instant) {
            self.dialog.update(
                open,
                now,
                &mut self.body,
                DialogEnv {
                    keys: &mut self.keys,
                    page: &mut self.page,
                    focus: &mut self.focus,
                    announcer: &mut self.announcer,
                },
            );
        }

        fn key(&mut self, code: KeyCode) -> Handled {
            let key = KeyEvent::new(code, KeyModifiers::NONE);
            self.keys.dispatch(&key);
            self.dialog.handle_key(
                &key,
                &mut self.focus,
                &mut self.body,
                &self.callbacks,
                &mut self.announcer,
            )
        }

        fn draw(&mut self) {
            let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
            let theme = Theme::dark();
            let Self {
                dialog, body, focus, ..
            } = self;
            terminal
                .draw(|f| dialog.render(f, &*body, &*focus, &theme))
                .unwrap();
            self.dialog.on_frame();
        }

        fn click(&mut self, column: u16, row: u16) -> Handled {
            let mouse = MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            };
            self.dialog
                .handle_mouse(&mouse, &mut self.focus, &mut self.body, &self.callbacks)
        }

        fn content_rect(&self) -> Rect {
            self.dialog.hits.content.unwrap()
        }

        fn rect_of(&self, id: &str) -> Rect {
            self.dialog
                .hits
                .elements
                .iter()
                .find(|(e, _)| e.as_str() == id)
                .map(|(_, r)| *r)
                .unwrap()
        }
    }

    #[test]
    fn closed_dialog_renders_nothing_and_holds_nothing() {
        let mut h = Harness::new(None);
        h.update(false, Instant::now());
        assert!(!h.dialog.is_mounted());
        assert!(h.dialog.element(&h.body).is_none());
        assert_eq!(h.keys.listener_count(), 0);
        assert_eq!(h.page.overflow, Overflow::Auto);
    }

    #[test]
    fn opening_wires_collaborators() {
        let t0 = Instant::now();
        let mut h = Harness::new(None);
        h.update(true, t0);

        assert_eq!(h.dialog.phase(), AnimationPhase::Mounting);
        assert!(h.dialog.is_trap_active());
        assert!(h.dialog.is_escape_bound());
        assert_eq!(h.keys.listener_count(), 1);
        assert_eq!(h.page.overflow, Overflow::Hidden);
        assert_eq!(h.body.resets, 1);

        h.draw();
        assert_eq!(h.dialog.phase(), AnimationPhase::Visible);
    }

    #[test]
    fn zero_delays_still_wait_for_the_next_update() {
        let t0 = Instant::now();
        let mut h = Harness::with_delays(None, Duration::ZERO, Duration::ZERO);

        h.update(true, t0);
        assert!(h.focus.is_focused_str("open-form"));
        h.draw();
        h.update(true, t0);
        assert!(h.focus.is_focused_str(TITLE_ID));

        // The exit frame is drawn before the overlay goes away
        h.update(false, t0);
        assert_eq!(h.dialog.phase(), AnimationPhase::Unmounting);
        assert!(h.dialog.element(&h.body).is_some());
        h.update(false, t0);
        assert!(!h.dialog.is_mounted());
        assert_eq!(h.page.overflow, Overflow::Auto);
    }

    #[test]
    fn out_of_range_delays_never_fire() {
        let t0 = Instant::now();
        let huge = Duration::from_millis(u64::MAX);
        let mut h = Harness::with_delays(None, huge, huge);

        h.update(true, t0);
        h.draw();
        h.update(true, t0 + Duration::from_secs(60));
        assert!(h.focus.is_focused_str("open-form"));

        h.update(false, t0 + Duration::from_secs(61));
        h.update(false, t0 + Duration::from_secs(3600));
        assert!(h.dialog.is_mounted());
        assert_eq!(h.page.overflow, Overflow::Hidden);

        h.dialog.teardown(&mut h.keys, &mut h.page);
        assert_eq!(h.page.overflow, Overflow::Auto);
    }

    #[test]
    fn heading_takes_focus_after_delay() {
        let t0 = Instant::now();
        let mut h = Harness::new(Some("Tell us about you"));
        h.update(true, t0);
        h.update(true, t0 + FOCUS - Duration::from_millis(1));
        assert!(h.focus.is_focused_str("open-form"));

        h.update(true, t0 + FOCUS);
        assert!(h.focus.is_focused_str(TITLE_ID));
        let announcement = h.announcer.current().unwrap();
        assert_eq!(announcement.text, "Dialog: Apply. Tell us about you");
        assert_eq!(announcement.live, Live::Polite);
    }

    #[test]
    fn closing_before_focus_delay_cancels_focus_move() {
        let t0 = Instant::now();
        let mut h = Harness::new(None);
        h.update(true, t0);
        h.update(false, t0 + Duration::from_millis(50));
        h.update(false, t0 + Duration::from_millis(500));

        assert!(h.focus.is_focused_str("open-form"));
        assert!(h.announcer.current().is_none());
    }

    #[test]
    fn close_unbinds_escape_now_and_unlocks_after_exit() {
        let t0 = Instant::now();
        let mut h = Harness::new(None);
        h.update(true, t0);
        h.draw();

        let t1 = t0 + Duration::from_secs(1);
        h.update(false, t1);
        assert!(!h.dialog.is_escape_bound());
        assert!(!h.dialog.is_trap_active());
        assert!(h.dialog.is_mounted());
        assert_eq!(h.page.overflow, Overflow::Hidden);

        h.update(false, t1 + EXIT);
        assert!(!h.dialog.is_mounted());
        assert_eq!(h.page.overflow, Overflow::Auto);
        assert_eq!(h.keys.listener_count(), 0);
    }

    #[test]
    fn reopen_mid_exit_keeps_dialog_mounted() {
        let t0 = Instant::now();
        let mut h = Harness::new(None);
        h.update(true, t0);
        h.draw();
        h.update(false, t0 + Duration::from_millis(10));
        h.update(true, t0 + Duration::from_millis(100));
        h.update(true, t0 + Duration::from_millis(500));

        assert!(h.dialog.is_mounted());
        h.draw();
        assert_eq!(h.dialog.phase(), AnimationPhase::Visible);
        assert_eq!(h.body.resets, 2);
    }

    #[test]
    fn escape_closes_once_per_press_and_not_after_close() {
        let t0 = Instant::now();
        let mut h = Harness::new(None);
        h.update(true, t0);

        h.key(KeyCode::Esc);
        assert_eq!(h.closes.get(), 1);

        h.update(false, t0 + Duration::from_millis(10));
        h.key(KeyCode::Esc);
        assert_eq!(h.closes.get(), 1);
    }

    #[test]
    fn tab_wraps_inside_dialog() {
        let t0 = Instant::now();
        let mut h = Harness::new(None);
        h.update(true, t0);
        h.update(true, t0 + FOCUS);

        // heading -> close -> a -> b -> close
        h.key(KeyCode::Tab);
        assert!(h.focus.is_focused_str(CLOSE_ID));
        h.key(KeyCode::Tab);
        assert!(h.focus.is_focused_str("a"));
        h.key(KeyCode::Tab);
        assert!(h.focus.is_focused_str("b"));
        h.key(KeyCode::Tab);
        assert!(h.focus.is_focused_str(CLOSE_ID));
        h.key(KeyCode::BackTab);
        assert!(h.focus.is_focused_str("b"));
    }

    #[test]
    fn shift_tab_from_heading_stays_inside() {
        let t0 = Instant::now();
        let mut h = Harness::new(None);
        h.update(true, t0);
        h.update(true, t0 + FOCUS);
        h.key(KeyCode::BackTab);
        assert!(h.focus.is_focused_str("b"));
    }

    #[test]
    fn open_dialog_swallows_keys() {
        let mut h = Harness::new(None);
        h.update(true, Instant::now());
        assert_eq!(h.key(KeyCode::Char('q')), Handled::Yes);
    }

    #[test]
    fn close_affordance_and_body_submit() {
        let t0 = Instant::now();
        let mut h = Harness::new(None);
        h.update(true, t0);

        h.focus.focus(CLOSE_ID);
        h.key(KeyCode::Enter);
        assert_eq!(h.closes.get(), 1);

        h.focus.focus("a");
        h.key(KeyCode::Char('h'));
        h.key(KeyCode::Char('i'));
        h.focus.focus("b");
        h.key(KeyCode::Enter);
        assert_eq!(*h.submitted.borrow(), vec!["hi".to_string()]);
    }

    #[test]
    fn body_alert_is_announced_every_time() {
        let mut h = Harness::new(None);
        h.update(true, Instant::now());
        h.focus.focus("b");

        h.key(KeyCode::Enter);
        let first = h.announcer.current().unwrap().clone();
        h.key(KeyCode::Enter);
        let second = h.announcer.current().unwrap();

        assert_eq!(first.text, "Text required.");
        assert_eq!(first.live, Live::Assertive);
        assert!(second.seq > first.seq);
    }

    #[test]
    fn backdrop_click_closes_but_content_click_does_not() {
        let mut h = Harness::new(None);
        h.update(true, Instant::now());
        h.draw();

        let content = h.content_rect();
        // Inside the box on the border row: content, not backdrop
        assert_eq!(h.click(content.x + 1, content.y), Handled::Yes);
        assert_eq!(h.closes.get(), 0);

        assert_eq!(h.click(0, 0), Handled::Yes);
        assert_eq!(h.closes.get(), 1);
    }

    #[test]
    fn click_focuses_element_and_close_button_closes() {
        let mut h = Harness::new(None);
        h.update(true, Instant::now());
        h.draw();

        let a = h.rect_of("a");
        h.click(a.x, a.y);
        assert!(h.focus.is_focused_str("a"));
        assert_eq!(h.closes.get(), 0);

        let close = h.rect_of(CLOSE_ID);
        h.click(close.x, close.y);
        assert_eq!(h.closes.get(), 1);
    }

    #[test]
    fn tree_exposes_dialog_semantics() {
        let mut h = Harness::new(Some("Details"));
        h.update(true, Instant::now());
        let tree = h.dialog.element(&h.body).unwrap();

        assert_eq!(tree.role, Some(Role::Dialog));
        assert_eq!(tree.labelled_by, Some(TITLE_ID.into()));
        assert_eq!(tree.described_by, Some(DESCRIPTION_ID.into()));
        assert_eq!(tree.accessible_name(&tree), Some("Apply"));

        let content = tree.find(&CONTENT_ID.into()).unwrap();
        assert_eq!(content.role, Some(Role::Document));
        let main = tree.find(&BODY_ID.into()).unwrap();
        assert_eq!(main.role, Some(Role::Main));
        assert_eq!(main.label.as_deref(), Some("Form content"));
        assert!(tree.find(&TITLE_ID.into()).unwrap().accepts_focus());
    }

    #[test]
    fn no_description_means_no_described_by() {
        let mut h = Harness::new(None);
        h.update(true, Instant::now());
        let tree = h.dialog.element(&h.body).unwrap();
        assert_eq!(tree.described_by, None);
        assert!(tree.find(&DESCRIPTION_ID.into()).is_none());
    }

    #[test]
    fn teardown_releases_everything() {
        let mut h = Harness::new(None);
        h.update(true, Instant::now());
        h.dialog.teardown(&mut h.keys, &mut h.page);
        assert_eq!(h.keys.listener_count(), 0);
        assert_eq!(h.page.overflow, Overflow::Auto);
    }
}
