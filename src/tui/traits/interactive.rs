//! Interactive trait for components that handle keyboard input

use crossterm::event::KeyEvent;

/// Result of handling a key event
///
/// Tells the caller whether the component consumed the event or
/// if it should bubble up to the next layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed by the component
    Yes,
    /// Event was not handled, should bubble up
    No,
}

impl Handled {
    /// Create from a boolean (true = handled)
    pub fn from_bool(handled: bool) -> Self {
        if handled {
            Self::Yes
        } else {
            Self::No
        }
    }

    pub fn was_handled(self) -> bool {
        self == Self::Yes
    }
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        Self::from_bool(handled)
    }
}

/// Page-level components that take keys when no dialog is open
///
/// ```text
/// KeyEvent
///    │
///    ▼
/// Dialog (when open: trap, escape, body)
///    │ if not handled
///    ▼
/// App (global: F2, q)
///    │ if not handled
///    ▼
/// Page component (via Interactive)
/// ```
pub trait Interactive {
    /// Returns `Handled::Yes` if the component consumed the event
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Keybind hints for the status bar
    fn focus_hint(&self) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handled_from_bool() {
        assert_eq!(Handled::from(true), Handled::Yes);
        assert_eq!(Handled::from(false), Handled::No);
        assert!(Handled::Yes.was_handled());
        assert!(!Handled::No.was_handled());
    }
}
