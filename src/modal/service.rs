//! Single-slot decision broker
//!
//! A caller asks for a decision with [`ModalService::request_decision`] and
//! awaits the returned [`PendingDecision`]. The UI side owns the
//! [`ModalProvider`]: it reads `is_open()` to drive the dialog and resolves the
//! session through `submit()` / `cancel()` (or the callbacks it hands to the
//! dialog body).
//!
//! ```text
//!  requester task                     UI loop (provider owner)
//!  ──────────────                     ────────────────────────
//!  request_decision() ──▶ slot ◀────── is_open() -> Dialog open intent
//!        │                  │
//!        │ await            └── submit(data) / cancel()
//!        ▼                        takes the session, frees the slot,
//!  Some(data) | None  ◀──────────  then writes the oneshot
//! ```
//!
//! Only one session exists at a time. A second request while one is pending
//! is rejected with [`ModalError::SessionBusy`]; the pending caller is never
//! orphaned. Handles outlive nothing: once the provider is dropped every
//! handle fails fast with [`ModalError::OutsideProvider`].

use super::dialog::BodyCallbacks;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors surfaced by the modal service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModalError {
    /// Another decision is still pending
    #[error("a decision is already pending; only one modal session can be open")]
    SessionBusy,
    /// The handle's provider no longer exists (programming error)
    #[error("modal service used outside of its provider")]
    OutsideProvider,
}

struct Session<T> {
    id: u64,
    resolver: oneshot::Sender<Option<T>>,
}

struct Slot<T> {
    session: Option<Session<T>>,
    next_id: u64,
}

type SharedSlot<T> = Arc<Mutex<Slot<T>>>;

fn lock<T>(slot: &Mutex<Slot<T>>) -> MutexGuard<'_, Slot<T>> {
    // No code path panics while holding the lock, so a poisoned slot is still consistent
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Take the session out of the slot, then resolve it
///
/// The slot is free before the requester can observe the result, so a caller
/// that immediately asks again is never rejected as busy.
fn resolve<T>(slot: &Mutex<Slot<T>>, value: Option<T>) -> bool {
    let session = lock(slot).session.take();
    match session {
        Some(session) => {
            let outcome = if value.is_some() { "submitted" } else { "cancelled" };
            if session.resolver.send(value).is_err() {
                tracing::debug!("decision {} {} but the requester went away", session.id, outcome);
            } else {
                tracing::debug!("decision {} {}", session.id, outcome);
            }
            true
        }
        None => {
            tracing::warn!("resolution ignored: no decision pending");
            false
        }
    }
}

/// Owning side of the service; lives as long as the UI that hosts the dialog
pub struct ModalProvider<T> {
    slot: SharedSlot<T>,
}

impl<T: 'static> ModalProvider<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                session: None,
                next_id: 1,
            })),
        }
    }

    /// Requester handle, safe to move into spawned tasks
    pub fn service(&self) -> ModalService<T> {
        ModalService {
            slot: Arc::downgrade(&self.slot),
        }
    }

    /// Whether a decision is pending (the dialog's open intent)
    pub fn is_open(&self) -> bool {
        lock(&self.slot).session.is_some()
    }

    /// Resolve the pending decision with submitted data
    #[cfg(test)]
    pub fn submit(&self, value: T) -> bool {
        resolve(&self.slot, Some(value))
    }

    /// Resolve the pending decision as cancelled
    pub fn cancel(&self) -> bool {
        resolve(&self.slot, None)
    }

    /// Close callback for the dialog (Escape, backdrop, close affordance)
    pub fn close_callback(&self) -> super::Callback {
        let slot = Arc::downgrade(&self.slot);
        Rc::new(move || {
            if let Some(slot) = slot.upgrade() {
                resolve(&slot, None);
            }
        })
    }

    /// Submit / cancel callbacks wired to this provider for the dialog body
    pub fn body_callbacks(&self) -> BodyCallbacks<T> {
        let submit_slot = Arc::downgrade(&self.slot);
        BodyCallbacks {
            on_submit: Rc::new(move |value: T| {
                if let Some(slot) = submit_slot.upgrade() {
                    resolve(&slot, Some(value));
                }
            }),
            on_cancel: self.close_callback(),
        }
    }
}

impl<T: 'static> Default for ModalProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ModalProvider<T> {
    fn drop(&mut self) {
        if lock(&self.slot).session.is_some() {
            tracing::warn!("modal provider torn down with a pending decision; cancelling it");
            resolve(&self.slot, None);
        }
    }
}

/// Requester handle
pub struct ModalService<T> {
    slot: Weak<Mutex<Slot<T>>>,
}

impl<T> Clone for ModalService<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> ModalService<T> {
    fn upgrade(&self) -> Result<SharedSlot<T>, ModalError> {
        self.slot.upgrade().ok_or(ModalError::OutsideProvider)
    }

    /// Open the dialog and get a future for the user's decision
    ///
    /// Resolves to `Some(data)` on submit and `None` on cancellation.
    pub fn request_decision(&self) -> Result<PendingDecision<T>, ModalError> {
        let slot = self.upgrade()?;
        let mut slot = lock(&slot);
        if let Some(pending) = &slot.session {
            tracing::warn!(
                "decision request rejected: decision {} is still pending",
                pending.id
            );
            return Err(ModalError::SessionBusy);
        }

        let (resolver, receiver) = oneshot::channel();
        let id = slot.next_id;
        slot.next_id += 1;
        slot.session = Some(Session { id, resolver });
        tracing::info!("decision {} requested", id);

        Ok(PendingDecision { receiver })
    }

    #[allow(dead_code)]
    pub fn is_open(&self) -> Result<bool, ModalError> {
        let slot = self.upgrade()?;
        let open = lock(&slot).session.is_some();
        Ok(open)
    }
}

/// The user's eventual decision
#[must_use = "a decision does nothing unless awaited"]
pub struct PendingDecision<T> {
    receiver: oneshot::Receiver<Option<T>>,
}

impl<T> Future for PendingDecision<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(decision)) => Poll::Ready(decision),
            // Resolver dropped without a value: treat as cancelled
            Poll::Ready(Err(_)) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
