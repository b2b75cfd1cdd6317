//! Controller lifecycle state.

/// Lifecycle of a deferred-task controller.
///
/// Monotonic and forward-only: `Idle → Armed` on the first trigger
/// registration, `Armed → Executed` on the first fire (or abort).
/// `Executed` is terminal; every later fire attempt is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, no trigger registered yet.
    Idle,
    /// At least one trigger registered; waiting to fire.
    Armed,
    /// Fired (or aborted); cleanups consumed, no further transitions.
    Executed,
}

impl Lifecycle {
    /// True before any trigger registration.
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Lifecycle::Idle)
    }

    /// True while waiting to fire.
    #[inline]
    pub fn is_armed(&self) -> bool {
        matches!(self, Lifecycle::Armed)
    }

    /// True once the controller reached its terminal state.
    #[inline]
    pub fn is_executed(&self) -> bool {
        matches!(self, Lifecycle::Executed)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Lifecycle::Idle => "idle",
            Lifecycle::Armed => "armed",
            Lifecycle::Executed => "executed",
        }
    }
}
