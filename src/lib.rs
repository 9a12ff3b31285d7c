//! Allocator-hook bridge between a multiprecision kernel and an embedding
//! runtime.
//!
//! A GMP-shaped kernel performs every allocation through three
//! function-pointer slots it lets an embedder replace. This crate fills
//! those slots with entry points that delegate to the C heap and, when the
//! heap is exhausted, abandon the kernel call wholesale: the failure is
//! recorded as a pending [`runtime::RuntimeError`] and control unwinds to
//! the nearest [`runtime::recover`] scope. The kernel never sees a null
//! pointer and never runs cleanup for a failed allocation -- it has none.
//!
//! User-requested interrupts ride the same unwind, so the kernel only ever
//! has to tolerate one kind of abrupt abandonment.

pub mod alloc;
pub mod runtime;
pub mod util;
