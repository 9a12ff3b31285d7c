use std::cell::RefCell;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use super::error::RuntimeError;

/// The runtime lock, with the pending-error slot living inside it. Holding
/// a [`LockToken`] is the only way to reach the slot, which makes the
/// locking discipline impossible to skip rather than merely documented.
static RUNTIME: ReentrantMutex<RefCell<Option<RuntimeError>>> =
    ReentrantMutex::new(RefCell::new(None));

/// Scoped ownership of the runtime lock.
///
/// Reentrant: a thread already holding the lock can take further tokens
/// without blocking, and each token releases exactly once on drop -- the
/// lock itself only when the outermost token goes. That is what lets the
/// failure path acquire unconditionally, whether the kernel was entered
/// with the lock held (the usual case) or without it.
pub struct LockToken<'a> {
    guard: ReentrantMutexGuard<'a, RefCell<Option<RuntimeError>>>,
}

/// Acquire the runtime lock, blocking while another thread holds it.
pub fn lock() -> LockToken<'static> {
    LockToken {
        guard: RUNTIME.lock(),
    }
}

impl LockToken<'_> {
    /// Record `err` as the pending error, replacing any earlier one.
    pub fn set_pending(&self, err: RuntimeError) {
        *self.guard.borrow_mut() = Some(err);
    }

    /// Like [`set_pending`](Self::set_pending), but reports instead of
    /// panicking when the slot is mid-borrow. Only the signal path wants
    /// this; a failed write there must still end in an unwind, not a
    /// panic-in-panic.
    pub(crate) fn try_set_pending(&self, err: RuntimeError) -> bool {
        match self.guard.try_borrow_mut() {
            Ok(mut slot) => {
                *slot = Some(err);
                true
            }
            Err(_) => false,
        }
    }

    /// Remove and return the pending error, if any.
    pub fn take_pending(&self) -> Option<RuntimeError> {
        self.guard.borrow_mut().take()
    }

    /// Is an error pending?
    pub fn pending(&self) -> bool {
        self.guard.borrow().is_some()
    }
}
