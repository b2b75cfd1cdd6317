//! # Diagnostic events emitted by the controller.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: arming, trigger attachment, the winning fire
//! - **Execution events**: task outcome, cleanup failures
//! - **Degradation events**: capabilities that were absent or refused
//!
//! The [`Event`] struct carries optional metadata such as the trigger kind,
//! task name, reasons, and guard delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore exact order when events are consumed
//! from independent subscriber queues.
//!
//! ## Example
//! ```rust
//! use defervisor::events::{Event, EventKind, FireSource};
//! use defervisor::TriggerKind;
//!
//! let ev = Event::new(EventKind::TriggerFired)
//!     .with_trigger(TriggerKind::Lcp)
//!     .via_guard();
//!
//! assert_eq!(ev.kind, EventKind::TriggerFired);
//! assert_eq!(ev.trigger, Some(TriggerKind::Lcp));
//! assert_eq!(ev.fire_source, Some(FireSource::Guard));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::triggers::TriggerKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of controller events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle events ===
    /// First trigger registered; the controller left `Idle`.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ControllerArmed,

    /// A trigger was attached and its platform resources registered.
    ///
    /// Sets:
    /// - `trigger`: trigger kind
    /// - `delay_ms`: guard interval, for triggers that schedule one
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TriggerAttached,

    /// A signal source won the race; cleanup and execution follow.
    ///
    /// Sets:
    /// - `trigger`: trigger kind that fired
    /// - `fire_source`: `Signal` (platform signal) or `Guard` (forced fire)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TriggerFired,

    /// Controller was explicitly aborted: cleanups ran, the task did not.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ControllerAborted,

    // === Execution events ===
    /// The wrapped task ran to completion.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskCompleted,

    /// The wrapped task returned an error or panicked.
    ///
    /// Never retried; this event is the only visible trace of the failure.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: failure or panic message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskFailed,

    /// A cleanup action panicked during teardown.
    ///
    /// The remaining cleanups still run; teardown is best-effort and total.
    ///
    /// Sets:
    /// - `reason`: panic message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CleanupFailed,

    // === Degradation events ===
    /// A metric-observer capability was absent or refused the subscription.
    ///
    /// The affected trigger degrades to its guard timer.
    ///
    /// Sets:
    /// - `trigger`: trigger kind that degraded
    /// - `reason`: "absent" or the capability's construction error
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ObserverUnavailable,
}

/// Which path invoked the fire operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireSource {
    /// The platform delivered the awaited signal.
    Signal,
    /// The bounded guard timer forced the fire.
    Guard,
}

/// Controller event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Trigger kind, if applicable.
    pub trigger: Option<TriggerKind>,
    /// Name of the wrapped task, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, degradation details, panic info).
    pub reason: Option<Arc<str>>,
    /// Guard interval in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Which path fired (signal vs guard).
    pub fire_source: Option<FireSource>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            trigger: None,
            task: None,
            reason: None,
            delay_ms: None,
            fire_source: None,
        }
    }

    /// Attaches the trigger kind.
    #[inline]
    pub fn with_trigger(mut self, trigger: TriggerKind) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a guard interval (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Marks that the awaited platform signal fired.
    #[inline]
    pub fn via_signal(mut self) -> Self {
        self.fire_source = Some(FireSource::Signal);
        self
    }

    /// Marks that the bounded guard timer forced the fire.
    #[inline]
    pub fn via_guard(mut self) -> Self {
        self.fire_source = Some(FireSource::Guard);
        self
    }
}
