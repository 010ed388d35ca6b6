//! Accessible modal dialog core
//!
//! ```text
//! ModalService ──▶ decides whether a dialog is open and which decision is pending
//!      │
//!      ▼
//!   Dialog ──▶ decides how that visibility is animated and focus-secured
//!      │
//!      ├── AnimationLifecycle  (Unmounted / Mounting / Visible / Unmounting)
//!      ├── FocusTrap           (Tab wraps inside the dialog while open)
//!      ├── ScrollLock          (page scrolling off while mounted)
//!      └── EscapeBinding       (Esc closes while open)
//! ```
//!
//! The body rendered inside the dialog is pluggable through [`DialogBody`].

pub mod announcer;
pub mod animation;
pub mod dialog;
pub mod element;
pub mod escape;
pub mod focus;
pub mod scroll_lock;
pub mod service;
pub mod timer;

use std::rc::Rc;

/// Zero-argument UI callback (close, cancel)
pub type Callback = Rc<dyn Fn()>;

pub use announcer::Announcer;
pub use dialog::{BodyCallbacks, BodyRenderContext, Dialog, DialogBody, DialogOptions};
pub use element::{Element, ElementId, ElementKind, Live, Role};
pub use escape::KeyListeners;
pub use focus::{tab_direction, FocusState};
pub use scroll_lock::{Overflow, ScrollLockable};
pub use service::{ModalProvider, ModalService};
// Rest of the public surface; the app reaches these through the types above
#[allow(unused_imports)]
pub use announcer::Announcement;
#[allow(unused_imports)]
pub use animation::{AnimationLifecycle, AnimationPhase};
#[allow(unused_imports)]
pub use escape::{EscapeBinding, KeyEventSource};
#[allow(unused_imports)]
pub use focus::{scan, FocusBounds, FocusTrap, TabDirection};
#[allow(unused_imports)]
pub use scroll_lock::ScrollLock;
#[allow(unused_imports)]
pub use service::{ModalError, PendingDecision};
#[allow(unused_imports)]
pub use timer::Timer;
