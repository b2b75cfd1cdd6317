//! Controller state-machine tests: construction validation, at-most-once
//! execution, cleanup completeness, chaining, abort, and the event stream.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use defervisor::events::{EventKind, FireSource};
use defervisor::platform::sim::{SimDispatcher, SimPage, SimPlatform};
use defervisor::platform::{
    EventDispatcher, EventTarget, ListenerHandle, ListenerOptions, PageEvent, Platform, SignalFn,
};
use defervisor::{After, Controller, ControllerError, On, TriggerKind, When};

use common::{counting_task, drain, drain_kinds, failing_task, panicking_task};

#[test]
fn builder_without_task_fails() {
    let sim = SimPlatform::new();
    let err = Controller::builder(sim.platform())
        .build()
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, ControllerError::MissingTask));
    assert_eq!(err.as_label(), "controller_missing_task");
}

#[test]
fn task_runs_at_most_once_across_many_deliveries() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("once");
    let ctrl = Controller::new(sim.platform(), task);

    ctrl.after(After::Delay(Duration::from_millis(100)))
        .and_then(|c| c.on(On::Interaction))
        .and_then(|c| c.on(On::Visible))
        .unwrap();

    // A burst of fire-eligible deliveries from every attached source.
    sim.dispatch(EventTarget::Window, PageEvent::Click);
    sim.dispatch(EventTarget::Window, PageEvent::KeyDown);
    sim.advance(Duration::from_millis(200));
    sim.dispatch(EventTarget::Document, PageEvent::VisibilityChange);
    sim.dispatch(EventTarget::Window, PageEvent::TouchStart);

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(ctrl.lifecycle().is_executed());
}

#[test]
fn first_trigger_tears_down_the_rest() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("race");
    let ctrl = Controller::new(sim.platform(), task);

    ctrl.when(When::idle())
        .and_then(|c| c.after(After::Delay(Duration::from_millis(50))))
        .and_then(|c| c.on(On::Interaction))
        .unwrap();

    assert!(ctrl.lifecycle().is_armed());
    assert_eq!(sim.idle_active(), 1);
    assert_eq!(sim.timers_active(), 2); // idle guard + delay
    assert_eq!(sim.listeners_active(), 3);

    sim.advance(Duration::from_millis(50));
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // Every loser's resource is gone, and later deliveries are inert.
    assert_eq!(sim.idle_active(), 0);
    assert_eq!(sim.timers_active(), 0);
    assert_eq!(sim.listeners_active(), 0);

    sim.run_idle();
    sim.dispatch(EventTarget::Window, PageEvent::Click);
    sim.advance(Duration::from_millis(10_000));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn chaining_arms_exactly_once() {
    let sim = SimPlatform::new();
    let (task, _runs) = counting_task("arm");
    let ctrl = Controller::new(sim.platform(), task);
    let mut rx = ctrl.events();

    ctrl.when(When::idle())
        .and_then(|c| c.after(After::Delay(Duration::from_millis(10))))
        .and_then(|c| c.on(On::scroll(0.5)))
        .unwrap();

    let armed = drain_kinds(&mut rx)
        .into_iter()
        .filter(|k| *k == EventKind::ControllerArmed)
        .count();
    assert_eq!(armed, 1);
}

#[test]
fn abort_runs_cleanups_without_the_task() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("aborted");
    let ctrl = Controller::new(sim.platform(), task);
    let mut rx = ctrl.events();

    ctrl.after(After::Delay(Duration::from_millis(100)))
        .and_then(|c| c.on(On::Interaction))
        .unwrap();
    assert_eq!(sim.timers_active(), 1);
    assert_eq!(sim.listeners_active(), 3);

    ctrl.abort();
    assert!(ctrl.lifecycle().is_executed());
    assert_eq!(sim.timers_active(), 0);
    assert_eq!(sim.listeners_active(), 0);

    // Terminal: the pending delay would have fired by now; nothing runs.
    sim.advance(Duration::from_millis(10_000));
    sim.dispatch(EventTarget::Window, PageEvent::Click);
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    // Idempotent.
    ctrl.abort();

    let kinds = drain_kinds(&mut rx);
    assert_eq!(
        kinds
            .iter()
            .filter(|k| **k == EventKind::ControllerAborted)
            .count(),
        1
    );
    assert!(!kinds.contains(&EventKind::TriggerFired));
    assert!(!kinds.contains(&EventKind::TaskCompleted));
}

#[test]
fn fire_after_abort_is_a_no_op() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("late");
    let ctrl = Controller::new(sim.platform(), task);

    ctrl.on(On::Visible).unwrap();
    ctrl.abort();

    sim.dispatch(EventTarget::Document, PageEvent::VisibilityChange);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn failing_task_is_contained_and_reported() {
    let sim = SimPlatform::new();
    let ctrl = Controller::new(sim.platform(), failing_task("beacon"));
    let mut rx = ctrl.events();

    ctrl.after(After::Delay(Duration::from_millis(5))).unwrap();
    sim.advance(Duration::from_millis(5));

    assert!(ctrl.lifecycle().is_executed());
    let events = drain(&mut rx);
    let failed = events
        .iter()
        .find(|e| e.kind == EventKind::TaskFailed)
        .expect("TaskFailed event");
    assert_eq!(failed.task.as_deref(), Some("beacon"));
    assert!(failed.reason.as_deref().unwrap().contains("boom"));
    assert!(!events.iter().any(|e| e.kind == EventKind::TaskCompleted));
}

#[test]
fn panicking_task_is_contained_and_reported() {
    let sim = SimPlatform::new();
    let ctrl = Controller::new(sim.platform(), panicking_task("volatile"));
    let mut rx = ctrl.events();

    ctrl.after(After::Delay(Duration::from_millis(5))).unwrap();
    // The panic must not escape through the platform callback.
    sim.advance(Duration::from_millis(5));

    let events = drain(&mut rx);
    let failed = events
        .iter()
        .find(|e| e.kind == EventKind::TaskFailed)
        .expect("TaskFailed event");
    assert!(failed.reason.as_deref().unwrap().contains("panicked"));
}

/// Dispatcher whose removals panic: teardown must still be total.
#[derive(Default)]
struct ExplosiveRemoval {
    inner: SimDispatcher,
}

impl EventDispatcher for ExplosiveRemoval {
    fn add_listener(
        &self,
        target: EventTarget,
        event: PageEvent,
        cb: SignalFn,
        opts: ListenerOptions,
    ) -> ListenerHandle {
        self.inner.add_listener(target, event, cb, opts)
    }

    fn remove_listener(&self, _handle: ListenerHandle) {
        panic!("removal refused");
    }
}

#[test]
fn one_failing_cleanup_does_not_block_the_rest() {
    let sim = SimPlatform::new();
    let dispatch = Arc::new(ExplosiveRemoval::default());
    let platform = Platform::new(
        Arc::clone(sim.timers()) as _,
        Arc::clone(&dispatch) as _,
        Arc::new(SimPage::default()) as _,
    );

    let (task, runs) = counting_task("resilient");
    let ctrl = Controller::new(platform, task);
    let mut rx = ctrl.events();

    // Visibility listener first so its (panicking) cleanup runs before the
    // delay's timer cleanup.
    ctrl.on(On::Visible)
        .and_then(|c| c.after(After::Delay(Duration::from_millis(10))))
        .unwrap();

    sim.advance(Duration::from_millis(10));

    // The panicking removal was swallowed, the timer cleanup still ran, and
    // the task still executed.
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(sim.timers_active(), 0);

    let kinds = drain_kinds(&mut rx);
    assert!(kinds.contains(&EventKind::CleanupFailed));
    assert!(kinds.contains(&EventKind::TaskCompleted));
}

#[test]
fn event_stream_records_the_full_lifecycle() {
    let sim = SimPlatform::new();
    let (task, _runs) = counting_task("traced");
    let ctrl = Controller::new(sim.platform(), task);
    let mut rx = ctrl.events();

    ctrl.after(After::Delay(Duration::from_millis(30))).unwrap();
    sim.advance(Duration::from_millis(30));

    let events = drain(&mut rx);
    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::ControllerArmed,
            EventKind::TriggerAttached,
            EventKind::TriggerFired,
            EventKind::TaskCompleted,
        ]
    );

    let fired = &events[2];
    assert_eq!(fired.trigger, Some(TriggerKind::Delay));
    assert_eq!(fired.fire_source, Some(FireSource::Signal));

    // Sequence numbers are globally monotonic.
    assert!(events.windows(2).all(|w| w[0].seq < w[1].seq));
}

#[test]
fn controllers_are_independent() {
    let sim = SimPlatform::new();
    let (task_a, runs_a) = counting_task("a");
    let (task_b, runs_b) = counting_task("b");

    let a = Controller::new(sim.platform(), task_a);
    let b = Controller::new(sim.platform(), task_b);
    a.after(After::Delay(Duration::from_millis(10))).unwrap();
    b.after(After::Delay(Duration::from_millis(20))).unwrap();

    sim.advance(Duration::from_millis(10));
    assert_eq!(runs_a.load(Ordering::SeqCst), 1);
    assert_eq!(runs_b.load(Ordering::SeqCst), 0);
    assert!(b.lifecycle().is_armed());

    sim.advance(Duration::from_millis(10));
    assert_eq!(runs_b.load(Ordering::SeqCst), 1);
}
