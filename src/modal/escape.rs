//! Global key listeners and the Escape-to-close binding

use super::Callback;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::rc::Rc;

/// A global key listener
pub type KeyListener = Rc<dyn Fn(&KeyEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Source of key events that listeners can subscribe to
pub trait KeyEventSource {
    fn add_listener(&mut self, listener: KeyListener) -> ListenerId;
    /// Returns false if the listener was not registered
    fn remove_listener(&mut self, id: ListenerId) -> bool;
}

/// Application-wide key listener registry
///
/// Every key event is dispatched here before focus routing, the terminal
/// equivalent of a document-level keydown listener.
#[derive(Default)]
pub struct KeyListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, KeyListener)>,
}

impl KeyListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, key: &KeyEvent) {
        // Snapshot so a listener may trigger (un)registration downstream
        let listeners: Vec<KeyListener> = self.listeners.iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener(key);
        }
    }

    #[allow(dead_code)]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl KeyEventSource for KeyListeners {
    fn add_listener(&mut self, listener: KeyListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}

/// Calls the close callback on Escape while the dialog's intent is open
#[derive(Debug, Default)]
pub struct EscapeBinding {
    listener: Option<ListenerId>,
}

impl EscapeBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.listener.is_some()
    }

    /// Install on open, tear down on close
    pub fn sync(&mut self, open: bool, source: &mut impl KeyEventSource, on_close: &Callback) {
        if open {
            self.install(source, on_close);
        } else {
            self.teardown(source);
        }
    }

    pub fn install(&mut self, source: &mut impl KeyEventSource, on_close: &Callback) {
        if self.listener.is_some() {
            return;
        }
        let on_close = on_close.clone();
        let id = source.add_listener(Rc::new(move |key: &KeyEvent| {
            // Press only: held keys report Repeat, some terminals report Release
            if key.code == KeyCode::Esc && key.kind == KeyEventKind::Press {
                on_close();
            }
        }));
        tracing::debug!(target: "modal_form::escape", "escape listener installed");
        self.listener = Some(id);
    }

    pub fn teardown(&mut self, source: &mut impl KeyEventSource) {
        if let Some(id) = self.listener.take() {
            source.remove_listener(id);
            tracing::debug!(target: "modal_form::escape", "escape listener removed");
        }
    }
}
