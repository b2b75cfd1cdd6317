//! # Platform capabilities.
//!
//! The controller never touches a real page environment. Every external
//! facility it reacts to is a narrow capability trait, injected at
//! construction as part of a [`Platform`] bundle:
//!
//! | Capability | Trait | Presence |
//! |---|---|---|
//! | timers | [`TimerScheduler`] | required |
//! | event listeners | [`EventDispatcher`] | required |
//! | visibility/geometry | [`PageState`] | required |
//! | idle scheduling | [`IdleScheduler`] | optional |
//! | metric observation | [`MetricObserver`] | optional |
//!
//! Two implementation families ship with the crate:
//! - [`runtime`] — tokio-backed timers and best-effort idle scheduling;
//! - [`sim`] — a fully deterministic in-memory platform (manual clock,
//!   recorded listeners, buffered metric history) for tests and examples.

mod dispatch;
mod idle;
mod observer;
mod page;
mod timer;

pub mod runtime;
pub mod sim;

pub use dispatch::{EventDispatcher, EventTarget, ListenerHandle, ListenerOptions, PageEvent};
pub use idle::{IdleHandle, IdleScheduler};
pub use observer::{
    EntryFn, MetricEntry, MetricKind, MetricObserver, MetricSubscription, ObserveRequest,
    FIRST_CONTENTFUL_PAINT,
};
pub use page::{PageState, Visibility};
pub use timer::{TimerHandle, TimerScheduler};

use std::sync::Arc;

/// Zero-argument signal callback handed to capabilities.
///
/// Shared (`Arc`) because a capability may hold it until delivery or
/// cancellation; the controller guards at-most-once execution internally, so
/// redundant deliveries are harmless.
pub type SignalFn = Arc<dyn Fn() + Send + Sync>;

/// Bundle of capabilities a controller is built around.
///
/// Timers, event dispatch, and page state are required; idle scheduling and
/// metric observation are optional, mirroring hosts where those facilities
/// simply do not exist. Triggers that depend on an absent capability degrade
/// to their guard timers.
///
/// # Example
/// ```
/// use defervisor::platform::sim::SimPlatform;
///
/// let sim = SimPlatform::new();
/// let platform = sim.platform();
/// assert!(platform.idle().is_some());
/// ```
#[derive(Clone)]
pub struct Platform {
    timers: Arc<dyn TimerScheduler>,
    dispatch: Arc<dyn EventDispatcher>,
    page: Arc<dyn PageState>,
    idle: Option<Arc<dyn IdleScheduler>>,
    observer: Option<Arc<dyn MetricObserver>>,
}

impl Platform {
    /// Creates a platform from the three required capabilities.
    pub fn new(
        timers: Arc<dyn TimerScheduler>,
        dispatch: Arc<dyn EventDispatcher>,
        page: Arc<dyn PageState>,
    ) -> Self {
        Self {
            timers,
            dispatch,
            page,
            idle: None,
            observer: None,
        }
    }

    /// Adds an idle-scheduling capability.
    pub fn with_idle(mut self, idle: Arc<dyn IdleScheduler>) -> Self {
        self.idle = Some(idle);
        self
    }

    /// Adds a metric-observation capability.
    pub fn with_observer(mut self, observer: Arc<dyn MetricObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Timer capability.
    pub fn timers(&self) -> &Arc<dyn TimerScheduler> {
        &self.timers
    }

    /// Event-dispatch capability.
    pub fn dispatch(&self) -> &Arc<dyn EventDispatcher> {
        &self.dispatch
    }

    /// Visibility/geometry capability.
    pub fn page(&self) -> &Arc<dyn PageState> {
        &self.page
    }

    /// Idle capability, if present.
    pub fn idle(&self) -> Option<&Arc<dyn IdleScheduler>> {
        self.idle.as_ref()
    }

    /// Metric-observer capability, if present.
    pub fn observer(&self) -> Option<&Arc<dyn MetricObserver>> {
        self.observer.as_ref()
    }
}
