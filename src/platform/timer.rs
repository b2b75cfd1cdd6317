//! # Timer capability.
//!
//! The one capability every trigger family relies on: plain delays are the
//! `after(Delay)` trigger itself, and the bounded guard timers for idle,
//! paint, and interaction signals are ordinary timers too. Unlike the idle
//! and observer capabilities, a timer facility is always present.

use std::time::Duration;

use super::SignalFn;

/// Opaque handle identifying a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Creates a handle from a capability-assigned id.
    pub fn new(id: u64) -> Self {
        TimerHandle(id)
    }

    /// The capability-assigned id.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// One-shot timer scheduling.
///
/// Implementations deliver `cb` once, approximately `after` from
/// registration, unless the timer is cleared first. Clearing an already
/// fired or unknown handle is a no-op.
pub trait TimerScheduler: Send + Sync {
    /// Schedules `cb` to run once after the given delay.
    fn set_timer(&self, cb: SignalFn, after: Duration) -> TimerHandle;

    /// Cancels a pending timer. No-op if it already fired or never existed.
    fn clear_timer(&self, handle: TimerHandle);
}
