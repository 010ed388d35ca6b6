//! Mount / animate / unmount timeline for the dialog
//!
//! Converts a boolean open intent into four phases:
//!
//! ```text
//!            intent=true              next frame
//! Unmounted ────────────▶ Mounting ─────────────▶ Visible
//!     ▲                    ▲    │                    │
//!     │ exit delay     intent=true  intent=false     │ intent=false
//!     │ elapsed            │    ▼                    ▼
//!     └─────────────── Unmounting ◀──────────────────┘
//! ```
//!
//! The element stays mounted through `Unmounting` so the exit transition can
//! play; it is removed only after the full exit delay elapses without the
//! intent flipping back. The Mounting -> Visible step waits for a drawn frame
//! so the enter transition starts from the pre-transition state.

use super::timer::Timer;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
    #[default]
    Unmounted,
    Mounting,
    Visible,
    Unmounting,
}

#[derive(Debug, Clone)]
pub struct AnimationLifecycle {
    phase: AnimationPhase,
    exit_delay: Duration,
    exit_timer: Timer,
}

impl AnimationLifecycle {
    pub fn new(exit_delay: Duration) -> Self {
        Self {
            phase: AnimationPhase::Unmounted,
            exit_delay,
            exit_timer: Timer::new(),
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Element is present (phase != Unmounted)
    pub fn is_mounted(&self) -> bool {
        self.phase != AnimationPhase::Unmounted
    }

    /// Enter-transition styling applies (phase == Visible)
    pub fn is_entered(&self) -> bool {
        self.phase == AnimationPhase::Visible
    }

    /// When the pending unmount will happen, if one is pending
    #[cfg(test)]
    pub fn exit_deadline(&self) -> Option<Instant> {
        self.exit_timer.deadline()
    }

    /// Feed the current open intent. Returns true if the phase changed.
    pub fn set_intent(&mut self, open: bool, now: Instant) -> bool {
        let next = match (self.phase, open) {
            (AnimationPhase::Unmounted, true) => AnimationPhase::Mounting,
            (AnimationPhase::Unmounting, true) => {
                // Re-opened mid-exit: the stale removal must not fire
                self.exit_timer.cancel();
                AnimationPhase::Mounting
            }
            (AnimationPhase::Mounting | AnimationPhase::Visible, false) => {
                self.exit_timer.schedule(now, self.exit_delay);
                AnimationPhase::Unmounting
            }
            (phase, _) => phase,
        };
        self.transition(next)
    }

    /// A frame was drawn: Mounting -> Visible
    pub fn on_frame(&mut self) -> bool {
        if self.phase == AnimationPhase::Mounting {
            return self.transition(AnimationPhase::Visible);
        }
        false
    }

    /// Advance timers: Unmounting -> Unmounted once the exit delay elapsed
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.phase == AnimationPhase::Unmounting && self.exit_timer.fire(now) {
            return self.transition(AnimationPhase::Unmounted);
        }
        false
    }

    fn transition(&mut self, next: AnimationPhase) -> bool {
        if next == self.phase {
            return false;
        }
        tracing::debug!(
            target: "modal_form::animation",
            "dialog phase {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
        true
    }
}
