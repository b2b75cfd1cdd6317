//! # Idle-scheduling capability.
//!
//! Host-reported low-priority windows. The capability is optional and
//! best-effort: `when(Idle)` always races it against a guard timer, so a
//! platform without idle scheduling still executes within the timeout.

use super::SignalFn;

/// Opaque handle identifying a pending idle request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdleHandle(u64);

impl IdleHandle {
    /// Creates a handle from a capability-assigned id.
    pub fn new(id: u64) -> Self {
        IdleHandle(id)
    }

    /// The capability-assigned id.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Idle-callback scheduling.
///
/// Implementations deliver `cb` once when the host next has idle capacity.
/// Cancelling an already delivered or unknown handle is a no-op.
pub trait IdleScheduler: Send + Sync {
    /// Requests an idle callback.
    fn request_idle(&self, cb: SignalFn) -> IdleHandle;

    /// Cancels a pending idle request.
    fn cancel_idle(&self, handle: IdleHandle);
}
