//! # Global controller configuration.
//!
//! Provides [`ControllerConfig`] centralized defaults for trigger guard
//! intervals and the event bus.
//!
//! Config is consumed in two ways:
//! 1. **Controller creation**: `Controller::builder(platform).config(cfg)`
//! 2. **Per-trigger defaults**: registrations that omit a value inherit it
//!    from here (`When::idle()` timeout, `On::Scroll { threshold: None }`).
//!
//! Explicit per-registration values always win over these defaults.

use std::time::Duration;

/// Global configuration for a deferred-task controller.
///
/// Defines:
/// - **Guard intervals**: bounded forced-fire timeouts for open-ended signals
/// - **Scroll default**: threshold used when `On::Scroll` supplies none
/// - **Event system**: bus capacity for diagnostic event delivery
///
/// Every open-ended signal (idle, paint metrics, awaited interaction) carries
/// a guard so an armed controller reaches `Executed` in bounded time even if
/// the platform never delivers the signal.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Guard timeout racing the idle callback in `when(Idle)`.
    ///
    /// The idle capability is optional and best-effort; this timer is the
    /// trigger's own fallback. Overridable per registration via
    /// [`When::idle_within`](crate::When::idle_within).
    pub idle_timeout: Duration,

    /// Forced-fire guard for the paint triggers (`LargestContentfulPaint`,
    /// `FirstContentfulPaint`).
    ///
    /// A page may never produce the observed paint entry, and the observer
    /// capability may be absent entirely; the guard caps the wait.
    pub paint_guard: Duration,

    /// Forced-fire guard for `after(Interaction)`.
    ///
    /// The user may never interact; the guard fires the task and detaches
    /// the interaction listeners in the same transition.
    pub interaction_guard: Duration,

    /// Threshold used by `on(Scroll)` when the registration supplies none.
    ///
    /// Fraction scrolled is `(scroll_offset + viewport_height) /
    /// document_height`; the trigger fires once the fraction meets or
    /// exceeds the threshold.
    pub scroll_threshold: f64,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events
    /// observe `Lagged` and skip older items. Minimum value is 1 (clamped).
    pub bus_capacity: usize,
}

impl ControllerConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The `Bus` uses this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ControllerConfig {
    /// Default configuration:
    ///
    /// - `idle_timeout = 2s`
    /// - `paint_guard = 3s`
    /// - `interaction_guard = 5s`
    /// - `scroll_threshold = 0.5`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_millis(2000),
            paint_guard: Duration::from_millis(3000),
            interaction_guard: Duration::from_millis(5000),
            scroll_threshold: 0.5,
            bus_capacity: 256,
        }
    }
}
