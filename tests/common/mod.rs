//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use defervisor::events::{Event, EventKind};
use defervisor::{TaskError, TaskFn, TaskRef};

/// A task that counts its invocations.
pub fn counting_task(name: &'static str) -> (TaskRef, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let task: TaskRef = TaskFn::arc(name, move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, TaskError>(())
    });
    (task, runs)
}

/// A task that always fails.
pub fn failing_task(name: &'static str) -> TaskRef {
    TaskFn::arc(name, || -> Result<(), TaskError> { Err(TaskError::fail("boom")) })
}

/// A task that panics.
pub fn panicking_task(name: &'static str) -> TaskRef {
    TaskFn::arc(name, || -> Result<(), TaskError> { panic!("task blew up") })
}

/// Drains every event currently buffered on the receiver.
pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

/// Drains buffered events down to their kinds.
pub fn drain_kinds(rx: &mut broadcast::Receiver<Event>) -> Vec<EventKind> {
    drain(rx).into_iter().map(|e| e.kind).collect()
}
