//! # Tokio-backed capability implementations.
//!
//! [`TokioTimers`] implements the timer capability on top of
//! `tokio::spawn` + `tokio::time::sleep`, with cancellation via
//! `CancellationToken`. Under `#[tokio::test(start_paused = true)]` the
//! timers follow tokio's virtual clock, which is how the crate's own guard
//! tests drive them.
//!
//! [`TokioIdle`] is a best-effort stand-in for a real idle signal: it
//! delivers the callback once the runtime has had a chance to drain its
//! ready queue. Hosts with a genuine idle notion should implement
//! [`IdleScheduler`](crate::platform::IdleScheduler) against it directly —
//! or omit the capability and rely on the guard timer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{IdleHandle, IdleScheduler, SignalFn, TimerHandle, TimerScheduler};

// Signal callbacks run after the registry lock is released, so a poisoned
// lock can only come from a panicking foreign thread; recover the guard
// rather than wedging every later registration.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One-shot timers driven by the tokio runtime.
///
/// Must be used from within a runtime; each `set_timer` spawns a task that
/// sleeps and then delivers the callback unless cancelled first.
#[derive(Default)]
pub struct TokioTimers {
    next_id: AtomicU64,
    pending: Arc<Mutex<HashMap<u64, CancellationToken>>>,
}

impl TokioTimers {
    /// Creates an empty timer registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers that have neither fired nor been cleared.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

impl TimerScheduler for TokioTimers {
    fn set_timer(&self, cb: SignalFn, after: Duration) -> TimerHandle {
        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
        let token = CancellationToken::new();
        lock(&self.pending).insert(id, token.clone());

        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(after) => {
                    lock(&pending).remove(&id);
                    cb();
                }
            }
        });

        TimerHandle::new(id)
    }

    fn clear_timer(&self, handle: TimerHandle) {
        if let Some(token) = lock(&self.pending).remove(&handle.value()) {
            token.cancel();
        }
    }
}

/// Best-effort idle scheduling on the tokio runtime.
///
/// Delivers the callback after yielding to the scheduler once, i.e. after
/// already-ready work has had a chance to run. This is an approximation of
/// "the host has spare capacity", not a real idle signal.
#[derive(Default)]
pub struct TokioIdle {
    next_id: AtomicU64,
    pending: Arc<Mutex<HashMap<u64, CancellationToken>>>,
}

impl TokioIdle {
    /// Creates an empty idle registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of idle requests not yet delivered or cancelled.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

impl IdleScheduler for TokioIdle {
    fn request_idle(&self, cb: SignalFn) -> IdleHandle {
        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
        let token = CancellationToken::new();
        lock(&self.pending).insert(id, token.clone());

        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::task::yield_now() => {
                    lock(&pending).remove(&id);
                    cb();
                }
            }
        });

        IdleHandle::new(id)
    }

    fn cancel_idle(&self, handle: IdleHandle) {
        if let Some(token) = lock(&self.pending).remove(&handle.value()) {
            token.cancel();
        }
    }
}
