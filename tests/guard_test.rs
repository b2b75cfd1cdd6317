//! Fallback guarantees: every open-ended signal reaches `Executed` within
//! its documented guard interval — at or after it, never before — both on
//! the sim clock and on the tokio-backed timers.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use defervisor::events::{EventKind, FireSource};
use defervisor::platform::runtime::{TokioIdle, TokioTimers};
use defervisor::platform::sim::{SimDispatcher, SimPage, SimPlatform};
use defervisor::platform::Platform;
use defervisor::{After, Controller, TriggerKind, When};

use common::{counting_task, drain};

#[test]
fn lcp_guard_fires_at_3000ms_without_entries() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("lcp-starved");
    let ctrl = Controller::new(sim.platform(), task);
    let mut rx = ctrl.events();
    ctrl.after(After::LargestContentfulPaint).unwrap();

    sim.advance(Duration::from_millis(2999));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    sim.advance(Duration::from_millis(1));
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let fired = drain(&mut rx)
        .into_iter()
        .find(|e| e.kind == EventKind::TriggerFired)
        .expect("TriggerFired event");
    assert_eq!(fired.trigger, Some(TriggerKind::Lcp));
    assert_eq!(fired.fire_source, Some(FireSource::Guard));
}

#[test]
fn fcp_guard_fires_without_an_observer_capability() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("fcp-bare");
    // No observer capability at all.
    let ctrl = Controller::new(sim.platform_bare(), task);
    let mut rx = ctrl.events();
    ctrl.after(After::FirstContentfulPaint).unwrap();

    let absent = drain(&mut rx)
        .into_iter()
        .find(|e| e.kind == EventKind::ObserverUnavailable)
        .expect("ObserverUnavailable event");
    assert_eq!(absent.reason.as_deref(), Some("absent"));

    sim.advance(Duration::from_millis(2999));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    sim.advance(Duration::from_millis(1));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn interaction_guard_fires_at_5000ms_and_detaches() {
    let sim = SimPlatform::new();
    let (task, runs) = counting_task("untouched");
    let ctrl = Controller::new(sim.platform(), task);
    ctrl.after(After::Interaction).unwrap();
    assert_eq!(sim.listeners_active(), 4);

    sim.advance(Duration::from_millis(4999));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    sim.advance(Duration::from_millis(1));
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // The forced fire performed the same detachment the signal would have.
    assert_eq!(sim.listeners_active(), 0);
}

// --- tokio-backed timers ---

fn tokio_platform(timers: &Arc<TokioTimers>) -> Platform {
    Platform::new(
        Arc::clone(timers) as _,
        Arc::new(SimDispatcher::default()) as _,
        Arc::new(SimPage::default()) as _,
    )
}

#[tokio::test(start_paused = true)]
async fn tokio_delay_fires_and_clears_the_loser() {
    let timers = Arc::new(TokioTimers::new());
    let (task, runs) = counting_task("tokio-delay");
    let ctrl = Controller::new(tokio_platform(&timers), task);

    ctrl.after(After::Delay(Duration::from_millis(100)))
        .and_then(|c| c.after(After::Delay(Duration::from_millis(5000))))
        .unwrap();
    assert_eq!(timers.pending(), 2);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(timers.pending(), 0);

    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn tokio_paint_guard_holds_the_3000ms_line() {
    let timers = Arc::new(TokioTimers::new());
    let (task, runs) = counting_task("tokio-fcp");
    let ctrl = Controller::new(tokio_platform(&timers), task);
    ctrl.after(After::FirstContentfulPaint).unwrap();

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn tokio_idle_wins_over_the_guard() {
    let timers = Arc::new(TokioTimers::new());
    let idle = Arc::new(TokioIdle::new());
    let (task, runs) = counting_task("tokio-idle");
    let platform = tokio_platform(&timers).with_idle(Arc::clone(&idle) as _);
    let ctrl = Controller::new(platform, task);

    ctrl.when(When::idle()).unwrap();

    // The best-effort idle delivers after a scheduler yield, long before
    // the 2000ms guard.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(idle.pending(), 0);
    assert_eq!(timers.pending(), 0);

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
