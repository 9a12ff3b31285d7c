use std::ffi::CStr;

/// `puts`... but safe, and it never allocates. The degraded failure path
/// reports through this because by then the heap is the thing that broke.
pub fn putstr(s: &CStr) {
    // SAFETY: `s` is a valid nul-terminated string for the duration of the
    //         call.
    unsafe { libc::puts(s.as_ptr()) };
}
