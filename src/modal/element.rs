//! Element tree - the rendering surface the dialog core reasons about
//!
//! The terminal has no DOM, so every frame the page, the dialog chrome and the
//! dialog body describe themselves as a tree of `Element`s. Pre-order traversal
//! of that tree is document order, which is what focus navigation follows.
//!
//! Nothing here is cached across frames: the tree is rebuilt from live state
//! whenever a key event needs it.

use std::fmt;

/// Stable identity of an element (`"modal-title"`, `"email"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an element is, as far as focus rules care
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Heading,
    Text,
    Button,
    /// Only focusable when it has a destination
    Link { href: Option<String> },
    Input,
    Select,
    TextArea,
    /// Plain container, alert region, overlay...
    Region,
}

/// Landmark / widget role exposed to assistive technology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Dialog,
    Document,
    Main,
    Alert,
}

/// Announcement priority for live regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Live {
    Polite,
    Assertive,
}

/// A node in the element tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    /// `None` = no explicit tab order; `Some(-1)` = programmatic focus only
    pub tab_index: Option<i32>,
    pub role: Option<Role>,
    /// Accessible name when there is no visible label element
    pub label: Option<String>,
    pub labelled_by: Option<ElementId>,
    pub described_by: Option<ElementId>,
    pub live: Option<Live>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            tab_index: None,
            role: None,
            label: None,
            labelled_by: None,
            described_by: None,
            live: None,
            children: Vec::new(),
        }
    }

    pub fn region(id: impl Into<ElementId>) -> Self {
        Self::new(id, ElementKind::Region)
    }

    pub fn button(id: impl Into<ElementId>, label: impl Into<String>) -> Self {
        Self::new(id, ElementKind::Button).with_label(label)
    }

    #[cfg(test)]
    pub fn input(id: impl Into<ElementId>) -> Self {
        Self::new(id, ElementKind::Input)
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn labelled_by(mut self, id: impl Into<ElementId>) -> Self {
        self.labelled_by = Some(id.into());
        self
    }

    pub fn described_by(mut self, id: Option<ElementId>) -> Self {
        self.described_by = id;
        self
    }

    pub fn with_live(mut self, live: Live) -> Self {
        self.live = Some(live);
        self
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Whether sequential (Tab) navigation may land on this element
    ///
    /// Interactive kinds are always in the set; anything else needs an explicit
    /// non-negative tab order.
    pub fn is_focusable(&self) -> bool {
        match &self.kind {
            ElementKind::Button
            | ElementKind::Input
            | ElementKind::Select
            | ElementKind::TextArea => true,
            ElementKind::Link { href } if href.is_some() => true,
            _ => self.tab_index.is_some_and(|t| t >= 0),
        }
    }

    /// Whether `focus()` may target this element at all (includes tabindex=-1)
    pub fn accepts_focus(&self) -> bool {
        self.is_focusable() || self.tab_index.is_some()
    }

    /// Pre-order traversal (document order), self included
    pub fn walk(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        for child in &self.children {
            child.collect(out);
        }
    }

    pub fn find(&self, id: &ElementId) -> Option<&Element> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.find(id).is_some()
    }

    /// Accessible name: explicit label, else the text of the labelling element
    #[allow(dead_code)]
    pub fn accessible_name<'a>(&'a self, root: &'a Element) -> Option<&'a str> {
        if let Some(label) = &self.label {
            return Some(label);
        }
        self.labelled_by
            .as_ref()
            .and_then(|id| root.find(id))
            .and_then(|e| e.label.as_deref())
    }
}
