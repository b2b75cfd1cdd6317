//! Per-trigger behavior: the idle race, delays, paint observation, the two
//! interaction shapes, visibility, and scroll depth.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use defervisor::events::EventKind;
use defervisor::platform::sim::SimPlatform;
use defervisor::platform::{
    EventTarget, MetricEntry, MetricKind, PageEvent, Visibility, FIRST_CONTENTFUL_PAINT,
};
use defervisor::{After, Controller, ControllerError, On, When};

use common::{counting_task, drain_kinds};

// --- when(Idle) ---

#[test]
fn idle_callback_wins_the_race() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("idle");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.when(When::idle()).unwrap();

    assert_eq!(sim.idle_active(), 1);
    assert_eq!(sim.timers_active(), 1);

    sim.run_idle();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    // The losing guard timer went down with the winner.
    assert_eq!(sim.timers_active(), 0);

    sim.advance(Duration::from_millis(10_000));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn idle_guard_wins_when_idle_never_fires() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("idle-guard");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.when(When::idle()).unwrap();

    sim.advance(Duration::from_millis(1999));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    sim.advance(Duration::from_millis(1));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    // The pending idle request was cancelled by the same transition.
    assert_eq!(sim.idle_active(), 0);
}

#[test]
fn idle_without_capability_degrades_to_the_timer() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("no-idle");
    let ctrl = Controller::new(sim.platform_bare(), task);
    ctrl.when(When::idle_within(Duration::from_millis(500))).unwrap();

    assert_eq!(sim.idle_active(), 0);
    sim.advance(Duration::from_millis(500));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

// --- after(Delay) ---

#[test]
fn delay_fires_once_after_the_interval() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("delayed");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.after(After::Delay(Duration::from_millis(100))).unwrap();

    sim.advance(Duration::from_millis(99));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    sim.advance(Duration::from_millis(1));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(sim.timers_active(), 0);
}

// --- after(Lcp / Fcp) ---

#[test]
fn lcp_entry_fires_the_task() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("lcp");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.after(After::LargestContentfulPaint).unwrap();

    assert_eq!(sim.subscriptions_active(), 1);
    sim.record_metric(MetricEntry::new(MetricKind::LargestContentfulPaint, "hero-image"));

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(sim.subscriptions_active(), 0);
    assert_eq!(sim.timers_active(), 0);
}

#[test]
fn lcp_buffered_entry_fires_on_late_subscription() {
    let sim = SimPlatform::new();
    // Milestone recorded before anyone was listening.
    sim.record_metric(MetricEntry::new(MetricKind::LargestContentfulPaint, "hero-image"));

    let (task, runs) = counting_task("late-lcp");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.after(After::LargestContentfulPaint).unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(ctrl.lifecycle().is_executed());
}

#[test]
fn fcp_filters_the_paint_stream_by_name() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("fcp");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.after(After::FirstContentfulPaint).unwrap();

    sim.record_metric(MetricEntry::new(MetricKind::Paint, "first-paint"));
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    sim.record_metric(MetricEntry::new(MetricKind::Paint, FIRST_CONTENTFUL_PAINT));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn fcp_ignores_lcp_entries() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("fcp-only");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.after(After::FirstContentfulPaint).unwrap();

    sim.record_metric(MetricEntry::new(MetricKind::LargestContentfulPaint, "hero-image"));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn observer_construction_failure_degrades_to_the_guard() {
    let sim = SimPlatform::new();
    sim.fail_observer("entry type rejected");

    let (task, runs) = counting_task("degraded");
    let ctrl = Controller::new(sim.platform(), task);
    let mut rx = ctrl.events();
    ctrl.after(After::FirstContentfulPaint).unwrap();

    assert!(drain_kinds(&mut rx).contains(&EventKind::ObserverUnavailable));
    assert_eq!(sim.subscriptions_active(), 0);

    sim.advance(Duration::from_millis(3000));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

// --- after(Interaction) ---

#[test]
fn awaited_interaction_registers_passive_capturing_listeners() {
    let sim = SimPlatform::new();
    let (task, _runs) = counting_task("inspect");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.after(After::Interaction).unwrap();

    let regs = sim.listener_registrations();
    assert_eq!(regs.len(), 4);
    for (target, _event, opts) in regs {
        assert_eq!(target, EventTarget::Window);
        assert!(opts.passive);
        assert!(opts.capture);
        assert!(!opts.once);
    }
}

#[test]
fn first_awaited_interaction_fires_and_detaches_all() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("poke");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.after(After::Interaction).unwrap();

    sim.dispatch(EventTarget::Window, PageEvent::PointerDown);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(sim.listeners_active(), 0);
    assert_eq!(sim.timers_active(), 0);

    sim.dispatch(EventTarget::Window, PageEvent::Click);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

// --- on(Interaction) ---

#[test]
fn direct_interaction_listeners_are_self_removing() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("tap");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.on(On::Interaction).unwrap();

    let regs = sim.listener_registrations();
    assert_eq!(regs.len(), 3);
    assert!(regs.iter().all(|(_, _, opts)| opts.once));

    sim.dispatch(EventTarget::Window, PageEvent::KeyDown);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(sim.listeners_active(), 0);

    sim.dispatch(EventTarget::Window, PageEvent::KeyDown);
    sim.dispatch(EventTarget::Window, PageEvent::Click);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn direct_interaction_has_no_guard() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("patient");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.on(On::Interaction).unwrap();

    assert_eq!(sim.timers_active(), 0);
    sim.advance(Duration::from_secs(3600));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

// --- on(Visible) ---

#[test]
fn visible_fires_only_in_the_foreground_state() {
    let sim = SimPlatform::new();
    sim.set_visibility(Visibility::Hidden);

    let (task, runs) = counting_task("surfaced");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.on(On::Visible).unwrap();

    // A change notification while still hidden does not fire.
    sim.dispatch(EventTarget::Document, PageEvent::VisibilityChange);
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    sim.set_visibility(Visibility::Visible);
    sim.dispatch(EventTarget::Document, PageEvent::VisibilityChange);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(sim.listeners_active(), 0);
}

// --- on(Scroll) ---

#[test]
fn scroll_threshold_boundary_is_inclusive() {
    let sim = SimPlatform::new();
    sim.set_geometry(0.0, 100.0, 1000.0);

    let (task, runs) = counting_task("depth");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.on(On::scroll(0.5)).unwrap();

    // fraction = (399.9 + 100) / 1000 = 0.4999 — just short.
    sim.scroll_to(399.9);
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    // fraction = (400 + 100) / 1000 = 0.5 exactly — fires.
    sim.scroll_to(400.0);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(sim.listeners_active(), 0);
}

#[test]
fn scroll_inherits_the_configured_default_threshold() {
    let sim = SimPlatform::new();
    sim.set_geometry(0.0, 100.0, 1000.0);

    let (task, runs) = counting_task("default-depth");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.on(On::scroll_default()).unwrap();

    sim.scroll_to(399.0);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    sim.scroll_to(400.0);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn scroll_with_zero_document_height_never_fires() {
    let sim = SimPlatform::new();
    sim.set_geometry(0.0, 0.0, 0.0);

    let (task, runs) = counting_task("empty-doc");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.on(On::scroll(0.5)).unwrap();

    sim.scroll_to(100.0);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn unusable_scroll_thresholds_are_rejected() {
    let sim = SimPlatform::new();
    let (task, _runs) = counting_task("bad-threshold");
    let ctrl = Controller::new(sim.platform(), task);

    for bad in [0.0, -0.25, 1.5, f64::NAN, f64::INFINITY] {
        let err = ctrl.on(On::scroll(bad)).map(|_| ()).unwrap_err();
        assert!(
            matches!(err, ControllerError::InvalidThreshold { .. }),
            "{bad} should be rejected"
        );
    }

    // Registration arms before it validates; nothing was attached.
    assert!(ctrl.lifecycle().is_armed());
    assert_eq!(sim.listeners_active(), 0);
}
