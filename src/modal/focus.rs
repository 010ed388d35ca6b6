//! Focus scanning, sequential navigation and the Tab focus trap
//!
//! - `scan()` enumerates the focusable elements of a container on demand
//! - `FocusState` owns the single active element of the document
//! - `FocusTrap` wraps Tab / Shift+Tab at the boundary of a subtree
//!
//! The focusable set is recomputed on every key event. Form content changes
//! between keystrokes (the validation alert appears and disappears), so a
//! cached set would go stale.

use super::element::{Element, ElementId};
use crate::tui::traits::Handled;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// First and last focusable elements of a container, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusBounds {
    pub first: Option<ElementId>,
    pub last: Option<ElementId>,
}

/// Focusable descendants of `container` in document order (container excluded)
pub fn focusable_elements(container: &Element) -> Vec<&Element> {
    container
        .walk()
        .into_iter()
        .skip(1)
        .filter(|e| e.is_focusable())
        .collect()
}

/// Pure function of the current tree - safe to call on every keystroke
pub fn scan(container: &Element) -> FocusBounds {
    let elements = focusable_elements(container);
    FocusBounds {
        first: elements.first().map(|e| e.id.clone()),
        last: elements.last().map(|e| e.id.clone()),
    }
}

/// Direction of a Tab key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

/// Classify a key event as Tab navigation
///
/// Terminals report Shift+Tab either as `BackTab` or as `Tab` + SHIFT.
pub fn tab_direction(key: &KeyEvent) -> Option<TabDirection> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::BackTab => Some(TabDirection::Backward),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            Some(TabDirection::Backward)
        }
        KeyCode::Tab => Some(TabDirection::Forward),
        _ => None,
    }
}

/// The document's single active element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    active: Option<ElementId>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ElementId> {
        self.active.as_ref()
    }

    pub fn is_focused(&self, id: &ElementId) -> bool {
        self.active.as_ref() == Some(id)
    }

    pub fn is_focused_str(&self, id: &str) -> bool {
        self.active.as_ref().is_some_and(|a| a.as_str() == id)
    }

    pub fn focus(&mut self, id: impl Into<ElementId>) {
        let id = id.into();
        if self.active.as_ref() != Some(&id) {
            tracing::debug!(target: "modal_form::focus", "focus -> {}", id);
        }
        self.active = Some(id);
    }

    #[allow(dead_code)]
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Drop focus if the active element is no longer part of `document`
    pub fn retain_within(&mut self, document: &Element) {
        if let Some(id) = &self.active {
            if !document.contains(id) {
                tracing::debug!(target: "modal_form::focus", "focused element {} detached", id);
                self.active = None;
            }
        }
    }

    /// Default sequential navigation over the whole document
    ///
    /// Moves to the next (or previous) focusable element after the active one
    /// in document order, wrapping at the ends. When the active element is not
    /// itself focusable (a heading with tabindex=-1) navigation continues from
    /// its position in the tree.
    pub fn advance(&mut self, document: &Element, direction: TabDirection) -> Option<ElementId> {
        let order = document.walk();
        let focusable: Vec<usize> = order
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_focusable())
            .map(|(i, _)| i)
            .collect();
        if focusable.is_empty() {
            return None;
        }

        let position = self
            .active
            .as_ref()
            .and_then(|id| order.iter().position(|e| &e.id == id));

        let target = match (position, direction) {
            (None, TabDirection::Forward) => focusable[0],
            (None, TabDirection::Backward) => focusable[focusable.len() - 1],
            (Some(pos), TabDirection::Forward) => focusable
                .iter()
                .copied()
                .find(|&i| i > pos)
                .unwrap_or(focusable[0]),
            (Some(pos), TabDirection::Backward) => focusable
                .iter()
                .rev()
                .copied()
                .find(|&i| i < pos)
                .unwrap_or(focusable[focusable.len() - 1]),
        };

        let id = order[target].id.clone();
        self.focus(id.clone());
        Some(id)
    }
}

/// Confines Tab navigation to a subtree while active
#[derive(Debug, Clone, Default)]
pub struct FocusTrap {
    active: bool,
}

impl FocusTrap {
    pub fn new(active: bool) -> Self {
        Self { active }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Handle a key event targeted at the trapped subtree
    ///
    /// Returns `Handled::Yes` when the default navigation was prevented and
    /// focus wrapped; `Handled::No` lets the caller run default navigation.
    pub fn handle_key(
        &self,
        key: &KeyEvent,
        container: &Element,
        focus: &mut FocusState,
    ) -> Handled {
        if !self.active {
            return Handled::No;
        }
        let Some(direction) = tab_direction(key) else {
            return Handled::No;
        };

        let FocusBounds {
            first: Some(first),
            last: Some(last),
        } = scan(container)
        else {
            // Nothing to trap
            return Handled::No;
        };

        match direction {
            TabDirection::Backward if focus.is_focused(&first) => {
                focus.focus(last);
                Handled::Yes
            }
            TabDirection::Forward if focus.is_focused(&last) => {
                focus.focus(first);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}
