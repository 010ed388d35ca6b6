// Application state for the TUI
//
// App owns the page, the dialog and its body, the decision provider and the
// document-level key listeners, and routes terminal input through them.
// Decisions are awaited in spawned tasks that report back over a channel.

use crate::application::ApplicationData;
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::modal::dialog::DialogEnv;
use crate::modal::{
    tab_direction, Announcer, BodyCallbacks, Dialog, Element, ElementId, FocusState,
    KeyListeners, ModalProvider, ModalService,
};
use crate::tui::components::application_form::ApplicationForm;
use crate::tui::components::logs_panel::LogsPanel;
use crate::tui::components::trigger_page::{TriggerPage, TRIGGER_ID};
use crate::tui::components::Toast;
use crate::tui::theme::Theme;
use crate::tui::traits::{Handled, Interactive};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Instant;
use tokio::sync::mpsc;

/// Root of the element tree; page and dialog overlay are its children
const DOCUMENT_ID: &str = "document";

/// Results flowing back into the event loop from spawned tasks
#[derive(Debug)]
pub enum AppMessage {
    /// A requested decision settled: submitted data or `None` for cancel
    DecisionSettled(Option<ApplicationData>),
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub page: TriggerPage,
    pub focus: FocusState,
    /// Document-level key listeners (the dialog's Escape binding)
    keys: KeyListeners,
    pub dialog: Dialog,
    pub form: ApplicationForm,
    provider: ModalProvider<ApplicationData>,
    service: ModalService<ApplicationData>,
    callbacks: BodyCallbacks<ApplicationData>,
    pub announcer: Announcer,
    pub log_buffer: LogBuffer,
    pub logs_panel: LogsPanel,
    pub show_logs: bool,
    pub toast: Option<Toast>,
    messages: mpsc::UnboundedSender<AppMessage>,
    /// Where focus was when the form was requested
    restore_focus_to: Option<ElementId>,
    /// Applied on the next update, after the settling event is done
    deferred_focus: Option<ElementId>,
    pub should_quit: bool,
    start_time: Instant,
}

impl App {
    pub fn new(
        config: Config,
        log_buffer: LogBuffer,
    ) -> (Self, mpsc::UnboundedReceiver<AppMessage>) {
        let (messages, messages_rx) = mpsc::unbounded_channel();

        let provider = ModalProvider::new();
        let service = provider.service();
        let callbacks = provider.body_callbacks();
        let dialog = Dialog::new(config.dialog.options(), provider.close_callback());

        let mut focus = FocusState::new();
        focus.focus(TRIGGER_ID);

        let app = Self {
            theme: Theme::by_name(&config.theme),
            show_logs: config.tui.show_logs,
            config,
            page: TriggerPage::new(),
            focus,
            keys: KeyListeners::new(),
            dialog,
            form: ApplicationForm::new(),
            provider,
            service,
            callbacks,
            announcer: Announcer::new(),
            log_buffer,
            logs_panel: LogsPanel::new(),
            toast: None,
            messages,
            restore_focus_to: None,
            deferred_focus: None,
            should_quit: false,
            start_time: Instant::now(),
        };
        (app, messages_rx)
    }

    /// Full element tree: the page, plus the dialog overlay while mounted
    pub fn document(&self) -> Element {
        let mut root = Element::region(DOCUMENT_ID).with_children(vec![self.page.element()]);
        if let Some(overlay) = self.dialog.element(&self.form) {
            root.push(overlay);
        }
        root
    }

    /// Ask the user for an application
    ///
    /// The request is made here, synchronously, so a busy slot is reported
    /// right away; the wait for the answer happens in a spawned task.
    pub fn open_form(&mut self, now: Instant) {
        match self.service.request_decision() {
            Ok(pending) => {
                self.restore_focus_to = self.focus.active().cloned();
                let messages = self.messages.clone();
                tokio::spawn(async move {
                    let decision = pending.await;
                    // Receiver gone means the loop already exited
                    let _ = messages.send(AppMessage::DecisionSettled(decision));
                });
            }
            Err(e) => {
                tracing::warn!("cannot open the application form: {}", e);
                self.toast = Some(Toast::error(e.to_string(), now));
            }
        }
    }

    pub fn handle_message(&mut self, message: AppMessage, now: Instant) {
        match message {
            AppMessage::DecisionSettled(Some(data)) => {
                match serde_json::to_string(&data) {
                    Ok(json) => tracing::info!("Submitted application data: {}", json),
                    Err(e) => tracing::error!("failed to serialize submission: {}", e),
                }
                self.toast = Some(Toast::new(
                    format!("Application submitted: {}", data.summary()),
                    now,
                ));
            }
            AppMessage::DecisionSettled(None) => {
                tracing::info!("Modal was cancelled");
                self.toast = Some(Toast::new("Application cancelled", now));
            }
        }
        self.deferred_focus = Some(
            self.restore_focus_to
                .take()
                .unwrap_or_else(|| ElementId::from(TRIGGER_ID)),
        );
    }

    /// Advance timers and sync the dialog with the provider's state
    pub fn update(&mut self, now: Instant) {
        if let Some(id) = self.deferred_focus.take() {
            if id.as_str() == TRIGGER_ID {
                self.page.scroll_trigger_into_view();
            }
            self.focus.focus(id);
        }

        let open = self.provider.is_open();
        self.dialog.update(
            open,
            now,
            &mut self.form,
            DialogEnv {
                keys: &mut self.keys,
                page: &mut self.page,
                focus: &mut self.focus,
                announcer: &mut self.announcer,
            },
        );

        let document = self.document();
        self.focus.retain_within(&document);

        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    /// A frame was drawn
    pub fn on_frame(&mut self) {
        self.dialog.on_frame();
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Press
            && key.code == KeyCode::Char('c')
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        // Document-level listeners see every key first
        self.keys.dispatch(&key);

        // Layer 1: the open dialog takes everything
        let handled = self.dialog.handle_key(
            &key,
            &mut self.focus,
            &mut self.form,
            &self.callbacks,
            &mut self.announcer,
        );
        if handled.was_handled() || key.kind != KeyEventKind::Press {
            return;
        }

        // Layer 2: global shortcuts
        match key.code {
            KeyCode::F(2) => {
                self.show_logs = !self.show_logs;
                return;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') if key.modifiers.is_empty() => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }
        if self.show_logs && self.logs_panel.handle_key(key) == Handled::Yes {
            return;
        }

        // Layer 3: the page
        if let Some(direction) = tab_direction(&key) {
            self.focus.advance(&self.page.element(), direction);
            return;
        }
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
            && self.focus.is_focused_str(TRIGGER_ID)
        {
            self.open_form(now);
            return;
        }
        self.page.handle_key(key);
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let handled = self.dialog.handle_mouse(
            &mouse,
            &mut self.focus,
            &mut self.form,
            &self.callbacks,
        );
        if handled.was_handled() {
            return;
        }

        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.page.scroll_wheel(true);
            }
            MouseEventKind::ScrollUp => {
                self.page.scroll_wheel(false);
            }
            MouseEventKind::Down(MouseButton::Left)
                if self.page.hits_trigger(mouse.column, mouse.row) =>
            {
                self.focus.focus(TRIGGER_ID);
                self.open_form(now);
            }
            _ => {}
        }
    }

    /// Keybind hints for the status bar
    pub fn status_hint(&self) -> String {
        if self.dialog.is_open() {
            return "Tab/Shift+Tab:move  Enter:submit  Esc:close".to_string();
        }
        let mut hint = self.page.focus_hint().unwrap_or_default().to_string();
        if self.show_logs {
            if let Some(logs) = self.logs_panel.focus_hint() {
                hint.push_str("  ");
                hint.push_str(logs);
            }
        }
        hint.push_str("  F2:logs  q:quit");
        hint
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Release listeners and the scroll lock before the terminal is restored
    pub fn shutdown(&mut self) {
        self.dialog.teardown(&mut self.keys, &mut self.page);
        if self.provider.is_open() && self.provider.cancel() {
            tracing::info!("pending decision cancelled on exit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::dialog::TITLE_ID;
    use crate::modal::Overflow;
    use crate::modal::ScrollLockable;
    use std::time::Duration;

    fn app() -> (App, mpsc::UnboundedReceiver<AppMessage>) {
        App::new(Config::default(), LogBuffer::new())
    }

    fn press(app: &mut App, code: KeyCode, now: Instant) {
        app.handle_key(KeyEvent::from(code), now);
    }

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), now);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Open through the trigger and run until the title has focus
    fn open(app: &mut App, t0: Instant) {
        press(app, KeyCode::Enter, t0);
        app.update(t0);
        app.on_frame();
        app.update(t0 + ms(100));
        assert!(app.focus.is_focused_str(TITLE_ID));
    }

    #[tokio::test]
    async fn submit_round_trip_returns_data_and_restores_focus() {
        let (mut app, mut rx) = app();
        let t0 = Instant::now();
        open(&mut app, t0);
        assert!(app.dialog.is_open());
        assert_eq!(app.page.overflow(), Overflow::Hidden);

        // title -> close -> name
        press(&mut app, KeyCode::Tab, t0);
        press(&mut app, KeyCode::Tab, t0);
        assert!(app.focus.is_focused_str("name"));
        type_text(&mut app, "X", t0);
        press(&mut app, KeyCode::Tab, t0);
        type_text(&mut app, "x@y.com", t0);
        press(&mut app, KeyCode::Tab, t0);
        press(&mut app, KeyCode::Right, t0);
        press(&mut app, KeyCode::Enter, t0);

        let Some(AppMessage::DecisionSettled(decision)) = rx.recv().await else {
            panic!("decision should settle");
        };
        let data = decision.expect("submitted");
        assert_eq!(data.name, "X");
        assert_eq!(data.email, "x@y.com");
        assert_eq!(data.experience, "0-3");

        app.handle_message(AppMessage::DecisionSettled(Some(data)), t0);
        app.update(t0 + ms(120));
        assert!(!app.dialog.is_open());
        assert!(app.focus.is_focused_str(TRIGGER_ID));
        assert!(app.toast.is_some());

        // Still mounted during the exit transition, then gone
        assert_eq!(app.page.overflow(), Overflow::Hidden);
        app.update(t0 + ms(120) + ms(300));
        assert!(!app.dialog.is_mounted());
        assert_eq!(app.page.overflow(), Overflow::Auto);
    }

    #[tokio::test]
    async fn escape_cancels() {
        let (mut app, mut rx) = app();
        let t0 = Instant::now();
        open(&mut app, t0);

        press(&mut app, KeyCode::Esc, t0);
        let Some(AppMessage::DecisionSettled(decision)) = rx.recv().await else {
            panic!("decision should settle");
        };
        assert_eq!(decision, None);
        assert!(!app.provider.is_open());
    }

    #[tokio::test]
    async fn trigger_reopens_right_after_a_cancel() {
        let (mut app, mut rx) = app();
        let t0 = Instant::now();
        open(&mut app, t0);

        press(&mut app, KeyCode::Esc, t0);
        let Some(message) = rx.recv().await else {
            panic!("decision should settle");
        };
        app.handle_message(message, t0);
        app.update(t0 + ms(110));
        assert!(app.focus.is_focused_str(TRIGGER_ID));

        // Same instant as the opening Enter: nothing swallows the second press
        press(&mut app, KeyCode::Enter, t0 + ms(110));
        assert!(app.provider.is_open());
        assert!(app.toast.as_ref().is_some_and(|t| !t.is_error));
    }

    #[tokio::test]
    async fn second_request_while_pending_is_rejected() {
        let (mut app, _rx) = app();
        let t0 = Instant::now();
        app.open_form(t0);
        assert!(app.toast.is_none());

        app.open_form(t0);
        assert!(app.toast.as_ref().is_some_and(|t| t.is_error));
        // First request untouched
        assert!(app.provider.is_open());
    }

    #[tokio::test]
    async fn page_never_sees_keys_while_open() {
        let (mut app, _rx) = app();
        let t0 = Instant::now();
        open(&mut app, t0);

        press(&mut app, KeyCode::Char('q'), t0);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::F(2), t0);
        assert!(!app.show_logs);
        press(&mut app, KeyCode::PageDown, t0);
        assert_eq!(app.page.scroll_offset(), 0);
    }

    #[tokio::test]
    async fn page_tab_stays_on_the_trigger() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Tab, Instant::now());
        assert!(app.focus.is_focused_str(TRIGGER_ID));
    }

    #[tokio::test]
    async fn shutdown_releases_everything_and_cancels() {
        let (mut app, mut rx) = app();
        let t0 = Instant::now();
        open(&mut app, t0);
        assert_eq!(app.keys.listener_count(), 1);

        app.shutdown();
        assert_eq!(app.keys.listener_count(), 0);
        assert_eq!(app.page.overflow(), Overflow::Auto);
        let Some(AppMessage::DecisionSettled(decision)) = rx.recv().await else {
            panic!("decision should settle");
        };
        assert_eq!(decision, None);
    }
}
