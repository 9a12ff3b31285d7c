//! Cooperative cancellation.
//!
//! Any thread (or a signal handler, it is just an atomic store) may flag a
//! running computation for abandonment; the thread driving the kernel
//! polls the flag at safe points between kernel calls. Delivery reuses the
//! allocation-failure machinery wholesale, so a cancelled kernel call and
//! an out-of-memory one look identical from the kernel's side.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::util::hint::cold;

static PENDING: AtomicBool = AtomicBool::new(false);

/// Flag the running computation for abandonment at its next
/// [`check_interrupt`].
pub fn request_interrupt() {
    PENDING.store(true, Ordering::SeqCst);
}

/// Has an interrupt been requested and not yet delivered?
pub fn interrupt_requested() -> bool {
    PENDING.load(Ordering::SeqCst)
}

/// Deliver a requested interrupt, if one is pending.
///
/// Call between kernel operations, never from inside one -- delivery
/// unwinds, and the unwind point has to be a place where the kernel's call
/// sequence can be abandoned wholesale. Consumes the flag, so a request is
/// delivered exactly once.
pub fn check_interrupt() {
    if PENDING.swap(false, Ordering::SeqCst) {
        cold(|| super::report_interrupt())
    }
}
