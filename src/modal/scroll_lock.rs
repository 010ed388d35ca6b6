//! Background scroll suppression while the dialog is mounted

/// Scroll behavior of a scrollable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Auto,
    Hidden,
}

/// Anything whose scrolling can be switched off
pub trait ScrollLockable {
    fn overflow(&self) -> Overflow;
    fn set_overflow(&mut self, overflow: Overflow);
}

/// Saves the target's overflow on lock and restores it on unlock
///
/// Locking twice does not stack: the second lock sees the lock already held
/// and leaves the saved value alone, so one unlock fully restores.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    saved: Option<Overflow>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn is_locked(&self) -> bool {
        self.saved.is_some()
    }

    pub fn lock(&mut self, target: &mut impl ScrollLockable) {
        if self.saved.is_some() {
            return;
        }
        self.saved = Some(target.overflow());
        target.set_overflow(Overflow::Hidden);
        tracing::debug!(target: "modal_form::scroll_lock", "background scroll locked");
    }

    pub fn unlock(&mut self, target: &mut impl ScrollLockable) {
        if let Some(previous) = self.saved.take() {
            target.set_overflow(previous);
            tracing::debug!(target: "modal_form::scroll_lock", "background scroll restored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Surface {
        overflow: Overflow,
        writes: usize,
    }

    impl ScrollLockable for Surface {
        fn overflow(&self) -> Overflow {
            self.overflow
        }

        fn set_overflow(&mut self, overflow: Overflow) {
            self.overflow = overflow;
            self.writes += 1;
        }
    }

    #[test]
    fn lock_hides_and_unlock_restores() {
        let mut surface = Surface::default();
        let mut lock = ScrollLock::new();

        lock.lock(&mut surface);
        assert_eq!(surface.overflow, Overflow::Hidden);
        assert!(lock.is_locked());

        lock.unlock(&mut surface);
        assert_eq!(surface.overflow, Overflow::Auto);
        assert!(!lock.is_locked());
    }

    #[test]
    fn double_lock_single_unlock_leaves_no_residue() {
        let mut surface = Surface::default();
        let mut lock = ScrollLock::new();

        lock.lock(&mut surface);
        lock.lock(&mut surface);
        lock.unlock(&mut surface);

        assert_eq!(surface.overflow, Overflow::Auto);
        assert!(!lock.is_locked());
    }

    #[test]
    fn restores_whatever_was_there_before() {
        let mut surface = Surface {
            overflow: Overflow::Hidden,
            writes: 0,
        };
        let mut lock = ScrollLock::new();
        lock.lock(&mut surface);
        lock.unlock(&mut surface);
        assert_eq!(surface.overflow, Overflow::Hidden);
    }

    #[test]
    fn unlock_without_lock_does_nothing() {
        let mut surface = Surface::default();
        let mut lock = ScrollLock::new();
        lock.unlock(&mut surface);
        assert_eq!(surface.writes, 0);
    }
}
