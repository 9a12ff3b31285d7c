use thiserror::Error;

/// What the bridge can leave pending on the runtime.
///
/// Exactly one kind exists for memory (`AllocationExhausted`); interrupts
/// share the taxonomy because they share the delivery mechanism. There is
/// no retry variant on purpose: the kernel cannot resume a call whose
/// allocation failed, so a retry would only replay the same unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The C heap could not satisfy a kernel allocation of `bytes` bytes.
    #[error("failed to allocate {bytes} bytes")]
    AllocationExhausted { bytes: usize },

    /// The computation was abandoned by a user-requested interrupt.
    #[error("interrupted")]
    Interrupted,
}
