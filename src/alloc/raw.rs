//! The raw heap under the bridge: C `malloc`/`realloc`/`free`.
//!
//! Already safe to call from any native call depth, with or without the
//! runtime lock held, and already thread-safe -- the bridge leans on all
//! three properties and adds none of its own. Nothing here unwinds;
//! exhaustion is an `Option` for the caller to escalate.

use std::ptr::NonNull;

use libc::c_void;

use crate::util::hint::cold;

/// Allocate `size` bytes. `None` when the heap is exhausted.
pub fn allocate(size: usize) -> Option<NonNull<u8>> {
    // SAFETY: `malloc` has no preconditions; a null return is handled
    //         below, not dereferenced.
    let data = unsafe { libc::malloc(size) };
    if data.is_null() {
        return cold(|| None);
    }
    NonNull::new(data as *mut u8)
}

/// Resize the allocation at `ptr` to `new_size` bytes, preserving content
/// up to the smaller of the two sizes. `None` when the heap is exhausted;
/// the original block is untouched in that case.
///
/// The heap tracks block sizes itself, so the old size is not a parameter
/// here even though callers further up the ABI carry one.
///
/// # Safety
///
/// - `ptr` must be a live allocation made through this module
/// - On success the old pointer is dead; only the returned one is valid
pub unsafe fn reallocate(ptr: NonNull<u8>, new_size: usize) -> Option<NonNull<u8>> {
    // SAFETY: Caller asserts `ptr` is live and ours, which is all
    //         `realloc` requires.
    let data = unsafe { libc::realloc(ptr.as_ptr() as *mut c_void, new_size) };
    if data.is_null() {
        return cold(|| None);
    }
    NonNull::new(data as *mut u8)
}

/// Return `ptr`'s block to the heap. Cannot fail.
///
/// # Safety
///
/// - `ptr` must be a live allocation made through this module
/// - `ptr` is dead after this call; releasing it twice is undefined
pub unsafe fn release(ptr: *mut u8) {
    // SAFETY: Identical contract to `free`, asserted by the caller.
    unsafe { libc::free(ptr as *mut c_void) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_writable_and_distinct() {
        let a = allocate(16).unwrap();
        let b = allocate(16).unwrap();
        assert_ne!(a, b);
        unsafe {
            a.as_ptr().write_bytes(0xaa, 16);
            b.as_ptr().write_bytes(0xbb, 16);
            assert_eq!(*a.as_ptr(), 0xaa);
            assert_eq!(*b.as_ptr(), 0xbb);
            release(a.as_ptr());
            release(b.as_ptr());
        }
    }

    #[test]
    fn reallocate_preserves_the_prefix() {
        let data = allocate(8).unwrap();
        unsafe {
            for i in 0..8 {
                data.as_ptr().add(i).write(i as u8);
            }
            let grown = reallocate(data, 1024).unwrap();
            for i in 0..8 {
                assert_eq!(*grown.as_ptr().add(i), i as u8);
            }
            release(grown.as_ptr());
        }
    }

    #[test]
    fn an_unsatisfiable_request_reports_exhaustion() {
        // No 64-bit heap can hand out half the address space.
        assert_eq!(allocate(usize::MAX / 2), None);
    }
}
