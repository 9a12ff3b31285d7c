//! The three allocator slots the kernel calls.
//!
//! Success paths hand the raw heap's pointer back unchanged -- the kernel
//! stores and dereferences it directly, so there is no room for an
//! indirection -- and touch no lock. The failure branch is cold and never
//! returns: by the time the kernel would have looked at a null pointer,
//! its whole call has already been abandoned.
//!
//! `alloc` and `realloc` are `C-unwind` because the failure path unwinds
//! straight through whatever kernel frames sit between the allocation site
//! and the recovery point. `free` cannot fail and stays plain `C`.

use std::ptr::NonNull;

use libc::{c_void, size_t};

use super::raw;
use crate::runtime::report_allocation_failure;

/// `allocate` slot. Returns a valid pointer or does not return.
#[no_mangle]
pub unsafe extern "C-unwind" fn mp_bridge_alloc(size: size_t) -> *mut c_void {
    match raw::allocate(size) {
        Some(data) => data.as_ptr() as *mut c_void,
        None => report_allocation_failure(size),
    }
}

/// `reallocate` slot. `old_size` is the kernel's own bookkeeping, carried
/// by the ABI; the heap only needs the pointer and the new size.
#[no_mangle]
pub unsafe extern "C-unwind" fn mp_bridge_realloc(
    ptr: *mut c_void,
    _old_size: size_t,
    new_size: size_t,
) -> *mut c_void {
    // SAFETY: The kernel only resizes pointers it got from
    //         `mp_bridge_alloc`, which never returns null.
    let ptr = unsafe { NonNull::new_unchecked(ptr as *mut u8) };
    // SAFETY: Same provenance argument: the block is live and ours.
    match unsafe { raw::reallocate(ptr, new_size) } {
        Some(data) => data.as_ptr() as *mut c_void,
        None => report_allocation_failure(new_size),
    }
}

/// `release` slot. `size` is accepted for ABI compatibility and ignored.
/// No error path exists here.
#[no_mangle]
pub unsafe extern "C" fn mp_bridge_free(ptr: *mut c_void, _size: size_t) {
    // SAFETY: The kernel releases each pointer it was handed at most once,
    //         which is the whole of `raw::release`'s contract.
    unsafe { raw::release(ptr as *mut u8) }
}
