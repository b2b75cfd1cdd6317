//! # Controller core: the run-once-and-cleanup-exactly-once state machine.
//!
//! Everything else in the crate is an enumeration of signal kinds; this file
//! is the part that has to be right. The rules:
//!
//! - the wrapped task runs **at most once**, no matter how many signal
//!   sources deliver;
//! - every registered cleanup runs **exactly once**, in registration order,
//!   during the same transition that decides execution (fire or abort);
//! - teardown precedes the task, so a signal source can never observe a
//!   half-dismantled registration from inside the task;
//! - nothing a cleanup or the task does (error or panic) escapes the
//!   transition — failures surface only as events.
//!
//! ## Locking discipline
//! All interior state lives behind one mutex. The winning transition takes
//! the cleanups and the task **under the lock**, then releases it before
//! running any foreign code; losers observe `Executed` and return. A cleanup
//! registered after the transition (an attach racing a fire from another
//! thread) runs immediately instead of leaking its resource.

use std::mem;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::events::{Bus, Event, EventKind, FireSource};
use crate::platform::{Platform, SignalFn};
use crate::tasks::TaskRef;
use crate::triggers::{self, After, On, TriggerKind, When};

use super::state::Lifecycle;
use super::ControllerBuilder;

/// Teardown action contributed by a trigger attachment.
pub(crate) type Cleanup = Box<dyn FnOnce() + Send>;

struct CoreState {
    lifecycle: Lifecycle,
    cleanups: Vec<Cleanup>,
    task: Option<TaskRef>,
}

/// Shared controller internals; triggers hold this through `Weak`
/// references inside their signal callbacks, so capability registries never
/// keep a fired controller alive.
pub(crate) struct CtrlInner {
    platform: Platform,
    cfg: ControllerConfig,
    bus: Bus,
    task_name: Arc<str>,
    state: Mutex<CoreState>,
}

impl CtrlInner {
    // User code never runs under the lock, so poisoning can only come from
    // a panicking foreign thread; recover the guard rather than wedging the
    // controller open forever.
    fn lock_state(&self) -> MutexGuard<'_, CoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn platform(&self) -> &Platform {
        &self.platform
    }

    pub(crate) fn cfg(&self) -> &ControllerConfig {
        &self.cfg
    }

    pub(crate) fn publish(&self, event: Event) {
        self.bus.publish(event);
    }

    pub(crate) fn lifecycle(&self) -> Lifecycle {
        self.lock_state().lifecycle
    }

    pub(crate) fn is_executed(&self) -> bool {
        self.lifecycle().is_executed()
    }

    /// Idle → Armed on the first registration. Idempotent.
    pub(crate) fn arm(&self) {
        let newly_armed = {
            let mut s = self.lock_state();
            if s.lifecycle.is_idle() {
                s.lifecycle = Lifecycle::Armed;
                true
            } else {
                false
            }
        };
        if newly_armed {
            self.publish(Event::new(EventKind::ControllerArmed));
        }
    }

    /// Registers a teardown action, or runs it immediately if the
    /// controller already executed (a racing attach must not leak).
    pub(crate) fn add_cleanup(&self, cleanup: Cleanup) {
        let mut s = self.lock_state();
        if s.lifecycle.is_executed() {
            drop(s);
            self.run_cleanup(cleanup);
        } else {
            s.cleanups.push(cleanup);
        }
    }

    /// Builds the callback a capability delivers to fire this controller.
    pub(crate) fn signal_fn(self: &Arc<Self>, trigger: TriggerKind, via: FireSource) -> SignalFn {
        let weak = Arc::downgrade(self);
        Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.fire(trigger, via);
            }
        })
    }

    /// The shared fire path. First caller wins; everyone else no-ops.
    pub(crate) fn fire(&self, trigger: TriggerKind, via: FireSource) {
        let (cleanups, task) = {
            let mut s = self.lock_state();
            if s.lifecycle.is_executed() {
                return;
            }
            s.lifecycle = Lifecycle::Executed;
            (mem::take(&mut s.cleanups), s.task.take())
        };

        let fired = Event::new(EventKind::TriggerFired).with_trigger(trigger);
        self.publish(match via {
            FireSource::Signal => fired.via_signal(),
            FireSource::Guard => fired.via_guard(),
        });

        for cleanup in cleanups {
            self.run_cleanup(cleanup);
        }

        if let Some(task) = task {
            self.run_task(task);
        }
    }

    /// The cleanup-without-execution transition. Terminal and idempotent.
    pub(crate) fn abort(&self) {
        let cleanups = {
            let mut s = self.lock_state();
            if s.lifecycle.is_executed() {
                return;
            }
            s.lifecycle = Lifecycle::Executed;
            s.task = None;
            mem::take(&mut s.cleanups)
        };

        self.publish(Event::new(EventKind::ControllerAborted));
        for cleanup in cleanups {
            self.run_cleanup(cleanup);
        }
    }

    /// Teardown is best-effort and total: one failing action must not block
    /// the rest, so each failure is captured and discarded individually.
    fn run_cleanup(&self, cleanup: Cleanup) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(cleanup)) {
            self.publish(
                Event::new(EventKind::CleanupFailed).with_reason(panic_message(payload.as_ref())),
            );
        }
    }

    fn run_task(&self, task: TaskRef) {
        let name = Arc::clone(&self.task_name);
        match catch_unwind(AssertUnwindSafe(|| task.run())) {
            Ok(Ok(())) => {
                self.publish(Event::new(EventKind::TaskCompleted).with_task(name));
            }
            Ok(Err(err)) => {
                self.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_task(name)
                        .with_reason(err.as_message()),
                );
            }
            Err(payload) => {
                self.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_task(name)
                        .with_reason(format!("panicked: {}", panic_message(payload.as_ref()))),
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Defers one task until the first of its registered triggers fires.
///
/// Built around an injected [`Platform`]; purely reactive — registration
/// returns immediately and firing is driven entirely by capability
/// callbacks. Cheap to clone; all clones share the same lifecycle.
///
/// # Example
/// ```
/// # fn main() -> Result<(), defervisor::ControllerError> {
/// use std::time::Duration;
/// use defervisor::platform::sim::SimPlatform;
/// use defervisor::{After, Controller, On, TaskError, TaskFn, TaskRef};
///
/// let sim = SimPlatform::new();
/// let task: TaskRef = TaskFn::arc("warm-cache", || Ok::<_, TaskError>(()));
///
/// let ctrl = Controller::new(sim.platform(), task);
/// ctrl.after(After::Delay(Duration::from_millis(250)))?
///     .on(On::scroll(0.75))?;
///
/// sim.advance(Duration::from_millis(250));
/// assert!(ctrl.lifecycle().is_executed());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Controller {
    inner: Arc<CtrlInner>,
}

impl Controller {
    /// Creates a controller with the default configuration and no
    /// subscribers. Use [`Controller::builder`] for more.
    pub fn new(platform: Platform, task: TaskRef) -> Self {
        let cfg = ControllerConfig::default();
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::from_parts(platform, cfg, bus, task)
    }

    /// Starts a builder around the given platform.
    pub fn builder(platform: Platform) -> ControllerBuilder {
        ControllerBuilder::new(platform)
    }

    pub(crate) fn from_parts(
        platform: Platform,
        cfg: ControllerConfig,
        bus: Bus,
        task: TaskRef,
    ) -> Self {
        let task_name: Arc<str> = task.name().into();
        Self {
            inner: Arc::new(CtrlInner {
                platform,
                cfg,
                bus,
                task_name,
                state: Mutex::new(CoreState {
                    lifecycle: Lifecycle::Idle,
                    cleanups: Vec::new(),
                    task: Some(task),
                }),
            }),
        }
    }

    /// Registers a host-readiness trigger.
    pub fn when(&self, when: When) -> Result<&Self, ControllerError> {
        self.inner.arm();
        match when {
            When::Idle { timeout } => triggers::idle::attach(&self.inner, timeout),
        }
        Ok(self)
    }

    /// Registers a bounded-wait trigger.
    pub fn after(&self, after: After) -> Result<&Self, ControllerError> {
        self.inner.arm();
        match after {
            After::Delay(delay) => triggers::delay::attach(&self.inner, delay),
            After::LargestContentfulPaint => triggers::paint::attach_lcp(&self.inner),
            After::FirstContentfulPaint => triggers::paint::attach_fcp(&self.inner),
            After::Interaction => triggers::interaction::attach_awaited(&self.inner),
        }
        Ok(self)
    }

    /// Registers a direct-signal trigger.
    pub fn on(&self, on: On) -> Result<&Self, ControllerError> {
        self.inner.arm();
        match on {
            On::Interaction => triggers::interaction::attach_direct(&self.inner),
            On::Visible => triggers::visible::attach(&self.inner),
            On::Scroll { threshold } => triggers::scroll::attach(&self.inner, threshold)?,
        }
        Ok(self)
    }

    /// Forces the cleanup-without-execution path: every registered cleanup
    /// runs, the task is dropped unrun, and the controller becomes terminal.
    /// Idempotent; a no-op after the controller has fired.
    pub fn abort(&self) {
        self.inner.abort();
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle()
    }

    /// Name of the wrapped task.
    pub fn task_name(&self) -> &str {
        &self.inner.task_name
    }

    /// Subscribes to the controller's diagnostic events.
    ///
    /// Each call creates an independent receiver observing subsequent
    /// events.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }
}
