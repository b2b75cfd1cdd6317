//! Trigger registration: signal families and attachment logic.
//!
//! The three registration families mirror how a caller thinks about
//! readiness:
//! - [`When`] — "when the host is ready" (idle capacity);
//! - [`After`] — "after something happens, or a bounded wait" (delay, paint
//!   milestones, awaited interaction — every open-ended kind carries a
//!   forced-fire guard);
//! - [`On`] — "on a direct page signal" (interaction, visibility, scroll
//!   depth — the signal either happens or the task is not wanted).
//!
//! Each attachment registers platform resources wired to the controller's
//! shared fire path and contributes cleanups that the winning signal tears
//! down. There is no priority between kinds: the first platform callback to
//! reach the fire path wins.
//!
//! [`TriggerKind`] is the flat label used in diagnostic events; its
//! `FromStr` impl is the entry point for config-driven callers and rejects
//! unknown kind strings with
//! [`ControllerError::UnsupportedTrigger`](crate::ControllerError).

use std::str::FromStr;
use std::time::Duration;

use crate::error::ControllerError;

pub(crate) mod delay;
pub(crate) mod idle;
pub(crate) mod interaction;
pub(crate) mod paint;
pub(crate) mod scroll;
pub(crate) mod visible;

/// Host-readiness triggers (`Controller::when`).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum When {
    /// Fire on host idle capacity, racing a guard timer.
    ///
    /// `timeout` overrides
    /// [`ControllerConfig::idle_timeout`](crate::ControllerConfig::idle_timeout);
    /// the timer is the trigger's own fallback, so an absent idle capability
    /// still executes within the timeout.
    Idle {
        /// Guard timeout override; `None` inherits the config default.
        timeout: Option<Duration>,
    },
}

impl When {
    /// Idle trigger with the configured default timeout.
    pub fn idle() -> Self {
        When::Idle { timeout: None }
    }

    /// Idle trigger with an explicit guard timeout.
    pub fn idle_within(timeout: Duration) -> Self {
        When::Idle { timeout: Some(timeout) }
    }
}

/// Bounded-wait triggers (`Controller::after`).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum After {
    /// Fire once the given time elapses. The delay is the trigger itself;
    /// no separate guard is needed.
    Delay(Duration),

    /// Fire on the first largest-contentful-paint entry (buffered
    /// observation), or after
    /// [`ControllerConfig::paint_guard`](crate::ControllerConfig::paint_guard).
    LargestContentfulPaint,

    /// Fire on the first paint entry named `first-contentful-paint`
    /// (buffered observation), or after the paint guard.
    FirstContentfulPaint,

    /// Fire on the first of pointer-down / click / key-down / touch-start,
    /// registered passive + capturing, or after
    /// [`ControllerConfig::interaction_guard`](crate::ControllerConfig::interaction_guard).
    /// The forced fire detaches the same listeners the signal would.
    Interaction,
}

/// Direct-signal triggers (`Controller::on`).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum On {
    /// Fire on the first of click / key-down / touch-start; each listener is
    /// self-removing.
    Interaction,

    /// Fire the first time the page reports the foreground-visible state.
    Visible,

    /// Fire the first time the scrolled fraction
    /// `(scroll_offset + viewport_height) / document_height` meets or
    /// exceeds the threshold.
    Scroll {
        /// Threshold override; `None` inherits
        /// [`ControllerConfig::scroll_threshold`](crate::ControllerConfig::scroll_threshold).
        /// Must be finite and within `(0.0, 1.0]`.
        threshold: Option<f64>,
    },
}

impl On {
    /// Scroll trigger with an explicit threshold.
    pub fn scroll(threshold: f64) -> Self {
        On::Scroll { threshold: Some(threshold) }
    }

    /// Scroll trigger with the configured default threshold.
    pub fn scroll_default() -> Self {
        On::Scroll { threshold: None }
    }
}

/// Flat trigger label used in diagnostic events and config-driven parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// `when(Idle)`.
    Idle,
    /// `after(Delay)`.
    Delay,
    /// `after(LargestContentfulPaint)`.
    Lcp,
    /// `after(FirstContentfulPaint)`.
    Fcp,
    /// `after(Interaction)` or `on(Interaction)`.
    Interaction,
    /// `on(Visible)`.
    Visible,
    /// `on(Scroll)`.
    Scroll,
}

impl TriggerKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TriggerKind::Idle => "idle",
            TriggerKind::Delay => "delay",
            TriggerKind::Lcp => "lcp",
            TriggerKind::Fcp => "fcp",
            TriggerKind::Interaction => "interaction",
            TriggerKind::Visible => "visible",
            TriggerKind::Scroll => "scroll",
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for TriggerKind {
    type Err = ControllerError;

    /// Parses a trigger-kind label.
    ///
    /// Unknown strings are rejected rather than silently accepted — a
    /// config-driven caller finds out about a typo at registration time, not
    /// by a trigger that never attaches anything.
    ///
    /// # Example
    /// ```
    /// use defervisor::{ControllerError, TriggerKind};
    ///
    /// assert_eq!("lcp".parse::<TriggerKind>().unwrap(), TriggerKind::Lcp);
    /// let err = "lpc".parse::<TriggerKind>().unwrap_err();
    /// assert!(matches!(err, ControllerError::UnsupportedTrigger { .. }));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(TriggerKind::Idle),
            "delay" => Ok(TriggerKind::Delay),
            "lcp" => Ok(TriggerKind::Lcp),
            "fcp" => Ok(TriggerKind::Fcp),
            "interaction" => Ok(TriggerKind::Interaction),
            "visible" => Ok(TriggerKind::Visible),
            "scroll" => Ok(TriggerKind::Scroll),
            other => Err(ControllerError::UnsupportedTrigger { kind: other.to_string() }),
        }
    }
}
