//! Error types used by the defervisor controller and wrapped tasks.
//!
//! This module defines three error enums:
//!
//! - [`ControllerError`] — errors raised at the controller's public boundary
//!   (construction and trigger registration).
//! - [`TaskError`] — errors returned by the wrapped task when it finally runs.
//! - [`ObserverError`] — errors raised by a metric-observer capability when a
//!   subscription cannot be constructed.
//!
//! All types provide helper methods (`as_label`, `as_message`) for
//! logs/metrics. Nothing inside the fire/cleanup/attach paths propagates
//! outward past the controller boundary: [`TaskError`] and [`ObserverError`]
//! are captured and reported on the event bus, never re-raised.

use thiserror::Error;

use crate::platform::MetricKind;

/// # Errors raised at the controller boundary.
///
/// These are the only errors a caller can observe: construction without a
/// task, an unsupported trigger-kind string, or an unusable scroll threshold.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ControllerError {
    /// The builder was finalized without a task to defer.
    #[error("controller requires a task; none was provided")]
    MissingTask,

    /// A trigger-kind string did not name any supported trigger.
    #[error("unsupported trigger kind: {kind:?}")]
    UnsupportedTrigger {
        /// The rejected kind string, verbatim.
        kind: String,
    },

    /// A scroll threshold outside the usable range.
    ///
    /// Thresholds must be finite and within `(0.0, 1.0]`: above `1.0` the
    /// scrolled fraction can never reach it, at or below `0.0` any scroll
    /// notification would fire.
    #[error("scroll threshold must be finite and within (0.0, 1.0], got {value}")]
    InvalidThreshold {
        /// The rejected threshold value.
        value: f64,
    },
}

impl ControllerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use defervisor::ControllerError;
    ///
    /// let err = ControllerError::MissingTask;
    /// assert_eq!(err.as_label(), "controller_missing_task");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ControllerError::MissingTask => "controller_missing_task",
            ControllerError::UnsupportedTrigger { .. } => "controller_unsupported_trigger",
            ControllerError::InvalidThreshold { .. } => "controller_invalid_threshold",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ControllerError::MissingTask => "no task provided".to_string(),
            ControllerError::UnsupportedTrigger { kind } => {
                format!("unsupported trigger kind: {kind:?}")
            }
            ControllerError::InvalidThreshold { value } => {
                format!("invalid scroll threshold: {value}")
            }
        }
    }
}

/// # Errors returned by the wrapped task.
///
/// A failing task is reported as [`EventKind::TaskFailed`] on the event bus
/// and never re-raised or retried — a deferred-scheduling utility must not be
/// able to crash the host it instruments.
///
/// [`EventKind::TaskFailed`]: crate::events::EventKind::TaskFailed
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`] from any displayable error.
    pub fn fail(error: impl std::fmt::Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
        }
    }
}

/// # Errors raised by a metric-observer capability.
///
/// Raised when the capability exists but rejects the requested subscription.
/// Attachment sites swallow this error: the trigger degrades to its guard
/// timer and the failure is visible only as
/// [`EventKind::ObserverUnavailable`] on the event bus.
///
/// [`EventKind::ObserverUnavailable`]: crate::events::EventKind::ObserverUnavailable
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ObserverError {
    /// The observer does not support the requested entry type.
    #[error("entry type not supported: {kind:?}")]
    Unsupported {
        /// The rejected entry type.
        kind: MetricKind,
    },

    /// The observer failed to construct the subscription.
    #[error("observer construction failed: {reason}")]
    Construction {
        /// Capability-specific failure detail.
        reason: String,
    },
}

impl ObserverError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ObserverError::Unsupported { .. } => "observer_unsupported",
            ObserverError::Construction { .. } => "observer_construction",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ObserverError::Unsupported { kind } => format!("unsupported entry type: {kind:?}"),
            ObserverError::Construction { reason } => format!("construction failed: {reason}"),
        }
    }
}
