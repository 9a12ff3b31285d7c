//! The embedding-runtime surface the bridge signals into: a global
//! reentrant lock, the pending-error slot behind it, and one unwinding
//! mechanism for everything that abandons a kernel call.

pub mod error;
pub mod interrupt;
pub mod lock;
pub mod unwind;

pub use error::RuntimeError;
pub use interrupt::{check_interrupt, interrupt_requested, request_interrupt};
pub use lock::{lock, LockToken};
pub use unwind::{raise, recover, Unwind};

use crate::util::print::putstr;

/// Record an out-of-memory condition and abandon the current kernel call.
/// Never returns.
///
/// Step order is load-bearing: take the lock (reentrantly -- the kernel is
/// usually entered with it already held, but not always), write the pending
/// error, drop the token, then unwind. The token must not survive into the
/// raise, or the lock would still be held at the recovery point.
#[cold]
pub fn report_allocation_failure(bytes: usize) -> ! {
    signal(
        RuntimeError::AllocationExhausted { bytes },
        Unwind::AllocationExhausted { bytes },
    )
}

/// Interrupt twin of [`report_allocation_failure`]: same lock discipline,
/// same non-local exit. Delivered from [`check_interrupt`], not called
/// directly by kernel code.
#[cold]
pub fn report_interrupt() -> ! {
    signal(RuntimeError::Interrupted, Unwind::Interrupted)
}

fn signal(err: RuntimeError, reason: Unwind) -> ! {
    {
        let token = lock::lock();
        if !token.try_set_pending(err) {
            // Slot is mid-borrow. Unreachable under the documented
            // lifecycle; if it happens anyway, say so without allocating
            // and unwind regardless -- returning into the kernel is the
            // one thing this path must never do.
            putstr(c"mpbridge: pending-error slot unwritable, unwinding anyway");
        }
    }
    unwind::raise(reason)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Mutex, MutexGuard, Once};

    /// The pending-error slot and interrupt flag are process-global, and
    /// the test harness runs tests in parallel. Tests that touch either
    /// take this first.
    static SHARED_STATE: Mutex<()> = Mutex::new(());

    pub(crate) fn exclusive() -> MutexGuard<'static, ()> {
        quiet_bridge_unwinds();
        SHARED_STATE.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Bridge unwinds are panics under the hood; keep the default hook
    /// from spamming the test log with expected ones.
    fn quiet_bridge_unwinds() {
        static QUIET: Once = Once::new();
        QUIET.call_once(|| {
            let default = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                if info.payload().downcast_ref::<super::Unwind>().is_none() {
                    default(info);
                }
            }));
        });
    }
}
