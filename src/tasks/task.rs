//! # Task abstraction for deferred execution.
//!
//! This module defines the [`DeferredTask`] trait. The common handle type is
//! [`TaskRef`], an `Arc<dyn DeferredTask>` suitable for sharing with the
//! controller.
//!
//! A deferred task runs synchronously inside the platform callback that won
//! the trigger race; it should be short (analytics beacons, widget
//! hydration, cache warming) and must not block for long.

use std::sync::Arc;

use crate::error::TaskError;

/// # A named, run-at-most-once unit of deferred work.
///
/// A `DeferredTask` has a stable [`name`](DeferredTask::name) used in
/// diagnostic events and a synchronous [`run`](DeferredTask::run) method.
/// The controller invokes `run` at most once over its whole lifetime; a
/// returned error is reported on the event bus and never retried.
///
/// # Example
/// ```
/// use defervisor::{DeferredTask, TaskError};
///
/// struct Hydrate;
///
/// impl DeferredTask for Hydrate {
///     fn name(&self) -> &str { "hydrate-widgets" }
///
///     fn run(&self) -> Result<(), TaskError> {
///         // mount the below-the-fold widgets...
///         Ok(())
///     }
/// }
/// ```
pub trait DeferredTask: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the task.
    ///
    /// Called at most once per controller. Errors are captured and reported
    /// as [`EventKind::TaskFailed`](crate::events::EventKind::TaskFailed);
    /// they do not propagate to the platform callback that fired.
    fn run(&self) -> Result<(), TaskError>;
}

/// Shared handle to a deferred task.
pub type TaskRef = Arc<dyn DeferredTask>;
