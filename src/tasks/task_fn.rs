//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn() -> Result<(), TaskError>`. The
//! controller guarantees at-most-once invocation, but the closure is `Fn`
//! rather than `FnOnce` because it lives behind a shared trait object; state
//! that must move into the task belongs in an explicit `Arc`/`Mutex` inside
//! the closure.

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::task::DeferredTask;

/// Function-backed task implementation.
///
/// The cheapest way to hand the controller a task.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a
    /// [`TaskRef`](crate::tasks::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the task and returns it as a shared handle.
    ///
    /// ## Example
    /// ```
    /// use defervisor::{TaskFn, TaskRef, TaskError};
    ///
    /// let t: TaskRef = TaskFn::arc("beacon", || Ok::<_, TaskError>(()));
    /// assert_eq!(t.name(), "beacon");
    /// ```
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> DeferredTask for TaskFn<F>
where
    F: Fn() -> Result<(), TaskError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> Result<(), TaskError> {
        (self.f)()
    }
}
