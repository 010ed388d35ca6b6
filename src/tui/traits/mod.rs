//! Component contracts for the TUI
//!
//! App routes key events through layers: the open dialog first, then global
//! shortcuts, then the page. Components report whether they consumed an event
//! with [`Handled`] so unhandled keys bubble to the next layer.

mod interactive;

pub use interactive::{Handled, Interactive};
