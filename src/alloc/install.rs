//! One-shot registration of the bridge's slots with the kernel.
//!
//! The kernel caches the three pointers internally, so installation is
//! write-once for the life of the process: swapping the slots again after
//! the kernel has allocated through them is not supported, and the
//! singleton here refuses to try.

use libc::{c_void, size_t};
use log::debug;
use once_cell::sync::OnceCell;

use super::hooks::{mp_bridge_alloc, mp_bridge_free, mp_bridge_realloc};

/// Signature of the kernel's `allocate` slot.
pub type AllocFn = unsafe extern "C-unwind" fn(size_t) -> *mut c_void;
/// Signature of the kernel's `reallocate` slot.
pub type ReallocFn = unsafe extern "C-unwind" fn(*mut c_void, size_t, size_t) -> *mut c_void;
/// Signature of the kernel's `release` slot.
pub type FreeFn = unsafe extern "C" fn(*mut c_void, size_t);

/// The three slots, laid out the way a registration call consumes them.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HookTable {
    pub alloc: AllocFn,
    pub realloc: ReallocFn,
    pub free: FreeFn,
}

/// The kernel's hook-registration entry point: one call accepting the
/// three slot addresses.
pub type RegisterFn = unsafe extern "C" fn(AllocFn, ReallocFn, FreeFn);

static INSTALLED: OnceCell<HookTable> = OnceCell::new();

/// Install the bridge as the kernel's allocator through `register`.
///
/// Idempotent: the first call registers, every later call returns the same
/// table without touching the kernel again. Must run before the kernel's
/// first allocation -- once the kernel has allocated through its default
/// slots, substituting them is a precondition violation this function
/// cannot detect.
///
/// # Safety
///
/// - `register` must be the kernel's own hook-registration entry point
/// - The kernel must not have performed any allocation yet
pub unsafe fn install_with(register: RegisterFn) -> &'static HookTable {
    INSTALLED.get_or_init(|| {
        let table = HookTable {
            alloc: mp_bridge_alloc,
            realloc: mp_bridge_realloc,
            free: mp_bridge_free,
        };
        // SAFETY: Caller asserts `register` is the kernel's registration
        //         call and that the kernel has not allocated yet.
        unsafe { register(table.alloc, table.realloc, table.free) };
        debug!("multiprecision allocator hooks installed");
        table
    })
}

/// The installed table, if [`install_with`] has run.
pub fn installed() -> Option<&'static HookTable> {
    INSTALLED.get()
}

#[cfg(feature = "gmp")]
mod gmp {
    use super::{AllocFn, FreeFn, ReallocFn};

    #[link(name = "gmp")]
    extern "C" {
        // A null slot keeps the library default; the bridge always
        // supplies all three.
        pub fn mp_set_memory_functions(
            alloc: Option<AllocFn>,
            realloc: Option<ReallocFn>,
            free: Option<FreeFn>,
        );
    }
}

/// Install the bridge into the linked GMP.
///
/// # Safety
///
/// GMP must not have allocated yet: call this before the first `mpz_*`
/// (or any other) operation, typically at interpreter start-up.
#[cfg(feature = "gmp")]
pub unsafe fn install() -> &'static HookTable {
    unsafe extern "C" fn register(alloc: AllocFn, realloc: ReallocFn, free: FreeFn) {
        // SAFETY: Forwards to GMP's own registration entry point.
        unsafe { gmp::mp_set_memory_functions(Some(alloc), Some(realloc), Some(free)) }
    }
    // SAFETY: Caller upholds the not-yet-allocated precondition; `register`
    //         is GMP's registration call by construction.
    unsafe { install_with(register) }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static REGISTRATIONS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn counting_register(_: AllocFn, _: ReallocFn, _: FreeFn) {
        REGISTRATIONS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn installation_is_write_once() {
        let first = unsafe { install_with(counting_register) };
        let again = unsafe { install_with(counting_register) };
        assert_eq!(REGISTRATIONS.load(Ordering::SeqCst), 1);
        assert!(std::ptr::eq(first, again));
        assert!(installed().is_some());
        assert!(first.alloc == mp_bridge_alloc as AllocFn);
        assert!(first.realloc == mp_bridge_realloc as ReallocFn);
        assert!(first.free == mp_bridge_free as FreeFn);
    }
}
