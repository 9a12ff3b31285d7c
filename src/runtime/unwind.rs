use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::error::RuntimeError;
use super::lock;

/// Payload carried by the bridge's non-local exit.
///
/// One mechanism covers every way a kernel call gets abandoned -- heap
/// exhaustion and user interrupts alike -- so the kernel's frames are only
/// ever traversed by one kind of unwind. The tag mirrors the pending error
/// and is only consulted when the recovery point finds the slot empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unwind {
    AllocationExhausted { bytes: usize },
    Interrupted,
}

impl Unwind {
    fn into_error(self) -> RuntimeError {
        match self {
            Unwind::AllocationExhausted { bytes } => RuntimeError::AllocationExhausted { bytes },
            Unwind::Interrupted => RuntimeError::Interrupted,
        }
    }
}

/// Abandon the current kernel call.
///
/// Unwinds every frame between here and the nearest [`recover`] scope, the
/// kernel's own frames included (the hook entry points are `C-unwind`, so
/// crossing them is defined). The kernel gets no chance to clean up, which
/// is the point: it has no recovery semantics for a failed allocation, so
/// its call sequence must be dropped wholesale, never resumed.
///
/// The caller must not hold a [`LockToken`](super::LockToken) across this
/// call; host-side tokens further down the stack release themselves as the
/// unwind passes through them.
pub fn raise(reason: Unwind) -> ! {
    panic::panic_any(reason)
}

/// The recovery point.
///
/// Runs `f`; if it unwinds via [`raise`], returns the pending error drained
/// from the runtime slot (or, should the slot be empty, the error the
/// payload tag names -- the two always agree when the signal path ran to
/// completion). A panic that is not a bridge unwind is resumed untouched.
pub fn recover<T>(f: impl FnOnce() -> T) -> Result<T, RuntimeError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(val) => Ok(val),
        Err(payload) => Err(error_from(payload)),
    }
}

fn error_from(payload: Box<dyn Any + Send>) -> RuntimeError {
    let reason = match payload.downcast::<Unwind>() {
        Ok(reason) => *reason,
        Err(other) => panic::resume_unwind(other),
    };
    let token = lock::lock();
    token.take_pending().unwrap_or_else(|| reason.into_error())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recover_passes_values_through() {
        assert_eq!(recover(|| 7), Ok(7));
    }

    #[test]
    fn recover_catches_a_raise_and_reports_the_reason() {
        let _x = crate::runtime::testing::exclusive();
        let err = recover(|| -> () { raise(Unwind::AllocationExhausted { bytes: 4096 }) });
        assert_eq!(err, Err(RuntimeError::AllocationExhausted { bytes: 4096 }));
    }

    #[test]
    fn recover_leaves_foreign_panics_alone() {
        let caught = std::panic::catch_unwind(|| recover(|| panic!("not ours")));
        let payload = caught.expect_err("the panic must pass through recover");
        assert_eq!(
            payload.downcast_ref::<&str>().copied(),
            Some("not ours"),
            "payload must arrive unconverted"
        );
    }

    #[test]
    fn recover_prefers_the_pending_error_over_the_payload() {
        let _x = crate::runtime::testing::exclusive();
        let err = recover(|| -> () {
            let token = lock::lock();
            token.set_pending(RuntimeError::AllocationExhausted { bytes: 9 });
            drop(token);
            raise(Unwind::Interrupted)
        });
        // Slot wins; the tag is only the fallback.
        assert_eq!(err, Err(RuntimeError::AllocationExhausted { bytes: 9 }));
    }
}
