//! # Deterministic in-memory platform.
//!
//! [`SimPlatform`] implements every capability against plain registries and
//! a manual clock, so trigger behavior can be exercised without a real page
//! environment or a running executor:
//!
//! - [`SimPlatform::advance`] moves the clock and fires due timers in
//!   deadline order;
//! - [`SimPlatform::run_idle`] delivers pending idle callbacks;
//! - [`SimPlatform::dispatch`] delivers a platform event to its listeners
//!   (honoring `once` self-removal);
//! - [`SimPlatform::record_metric`] records an entry and delivers it to
//!   matching subscriptions — entries recorded before a `buffered`
//!   subscription are replayed at subscribe time;
//! - visibility and geometry are settable.
//!
//! Callbacks always run with the registries unlocked, so a delivery may
//! re-enter the platform (the controller's teardown does exactly that).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::ObserverError;

use super::{
    EntryFn, EventDispatcher, EventTarget, IdleHandle, IdleScheduler, ListenerHandle,
    ListenerOptions, MetricEntry, MetricKind, MetricObserver, MetricSubscription, ObserveRequest,
    PageEvent, PageState, Platform, SignalFn, TimerHandle, TimerScheduler, Visibility,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// --- timers ---

struct TimerEntry {
    id: u64,
    due: Duration,
    cb: SignalFn,
}

#[derive(Default)]
struct TimersState {
    now: Duration,
    next_id: u64,
    pending: Vec<TimerEntry>,
}

/// Manual-clock timer capability.
#[derive(Default)]
pub struct SimTimers {
    state: Mutex<TimersState>,
}

impl SimTimers {
    /// Advances the clock, firing due timers in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = lock(&self.state).now + by;
        loop {
            let next = {
                let mut s = lock(&self.state);
                let idx = s
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.due <= target)
                    .min_by_key(|(_, e)| (e.due, e.id))
                    .map(|(i, _)| i);
                match idx {
                    Some(i) => {
                        let entry = s.pending.remove(i);
                        s.now = entry.due;
                        Some(entry.cb)
                    }
                    None => {
                        s.now = target;
                        None
                    }
                }
            };
            match next {
                Some(cb) => cb(),
                None => break,
            }
        }
    }

    /// Timers that have neither fired nor been cleared.
    pub fn pending(&self) -> usize {
        lock(&self.state).pending.len()
    }
}

impl TimerScheduler for SimTimers {
    fn set_timer(&self, cb: SignalFn, after: Duration) -> TimerHandle {
        let mut s = lock(&self.state);
        let id = s.next_id;
        s.next_id += 1;
        let due = s.now + after;
        s.pending.push(TimerEntry { id, due, cb });
        TimerHandle::new(id)
    }

    fn clear_timer(&self, handle: TimerHandle) {
        lock(&self.state).pending.retain(|e| e.id != handle.value());
    }
}

// --- idle ---

#[derive(Default)]
struct IdleState {
    next_id: u64,
    pending: Vec<(u64, SignalFn)>,
}

/// Manually delivered idle capability.
#[derive(Default)]
pub struct SimIdle {
    state: Mutex<IdleState>,
}

impl SimIdle {
    /// Delivers all pending idle callbacks.
    pub fn run(&self) {
        let batch = std::mem::take(&mut lock(&self.state).pending);
        for (_, cb) in batch {
            cb();
        }
    }

    /// Idle requests not yet delivered or cancelled.
    pub fn pending(&self) -> usize {
        lock(&self.state).pending.len()
    }
}

impl IdleScheduler for SimIdle {
    fn request_idle(&self, cb: SignalFn) -> IdleHandle {
        let mut s = lock(&self.state);
        let id = s.next_id;
        s.next_id += 1;
        s.pending.push((id, cb));
        IdleHandle::new(id)
    }

    fn cancel_idle(&self, handle: IdleHandle) {
        lock(&self.state).pending.retain(|(id, _)| *id != handle.value());
    }
}

// --- event dispatch ---

struct ListenerEntry {
    id: u64,
    target: EventTarget,
    event: PageEvent,
    opts: ListenerOptions,
    cb: SignalFn,
}

#[derive(Default)]
struct DispatchState {
    next_id: u64,
    listeners: Vec<ListenerEntry>,
}

/// Recording event dispatcher.
#[derive(Default)]
pub struct SimDispatcher {
    state: Mutex<DispatchState>,
}

impl SimDispatcher {
    /// Delivers an event to its registered listeners, honoring `once`.
    pub fn dispatch(&self, target: EventTarget, event: PageEvent) {
        let matching: Vec<u64> = lock(&self.state)
            .listeners
            .iter()
            .filter(|l| l.target == target && l.event == event)
            .map(|l| l.id)
            .collect();

        for id in matching {
            // Re-check per delivery: an earlier callback in this batch may
            // have detached later listeners.
            let cb = {
                let mut s = lock(&self.state);
                match s.listeners.iter().position(|l| l.id == id) {
                    Some(i) => {
                        if s.listeners[i].opts.once {
                            let entry = s.listeners.remove(i);
                            entry.cb
                        } else {
                            Arc::clone(&s.listeners[i].cb)
                        }
                    }
                    None => continue,
                }
            };
            cb();
        }
    }

    /// Listeners currently registered.
    pub fn active(&self) -> usize {
        lock(&self.state).listeners.len()
    }

    /// Snapshot of current registrations (target, event, options).
    pub fn registrations(&self) -> Vec<(EventTarget, PageEvent, ListenerOptions)> {
        lock(&self.state)
            .listeners
            .iter()
            .map(|l| (l.target, l.event, l.opts))
            .collect()
    }
}

impl EventDispatcher for SimDispatcher {
    fn add_listener(
        &self,
        target: EventTarget,
        event: PageEvent,
        cb: SignalFn,
        opts: ListenerOptions,
    ) -> ListenerHandle {
        let mut s = lock(&self.state);
        let id = s.next_id;
        s.next_id += 1;
        s.listeners.push(ListenerEntry { id, target, event, opts, cb });
        ListenerHandle::new(id)
    }

    fn remove_listener(&self, handle: ListenerHandle) {
        lock(&self.state).listeners.retain(|l| l.id != handle.value());
    }
}

// --- metric observation ---

struct SubEntry {
    id: u64,
    kind: MetricKind,
    cb: EntryFn,
}

#[derive(Default)]
struct ObserverState {
    next_id: u64,
    fail: Option<String>,
    history: Vec<MetricEntry>,
    subs: Vec<SubEntry>,
}

/// Recording metric observer with buffered-entry replay.
#[derive(Default)]
pub struct SimObserver {
    state: Arc<Mutex<ObserverState>>,
}

struct SimSubscription {
    id: u64,
    state: Arc<Mutex<ObserverState>>,
}

impl MetricSubscription for SimSubscription {
    fn disconnect(&self) {
        lock(&self.state).subs.retain(|s| s.id != self.id);
    }
}

impl SimObserver {
    /// Records an entry and delivers it to matching subscriptions.
    pub fn record(&self, entry: MetricEntry) {
        let deliveries: Vec<EntryFn> = {
            let mut s = lock(&self.state);
            s.history.push(entry.clone());
            s.subs
                .iter()
                .filter(|sub| sub.kind == entry.kind)
                .map(|sub| Arc::clone(&sub.cb))
                .collect()
        };
        for cb in deliveries {
            cb(std::slice::from_ref(&entry));
        }
    }

    /// Makes subsequent `observe` calls fail with a construction error.
    pub fn fail_with(&self, reason: &str) {
        lock(&self.state).fail = Some(reason.to_string());
    }

    /// Subscriptions currently connected.
    pub fn active(&self) -> usize {
        lock(&self.state).subs.len()
    }
}

impl MetricObserver for SimObserver {
    fn observe(
        &self,
        request: ObserveRequest,
        cb: EntryFn,
    ) -> Result<Box<dyn MetricSubscription>, ObserverError> {
        let (id, replay) = {
            let mut s = lock(&self.state);
            if let Some(reason) = &s.fail {
                return Err(ObserverError::Construction { reason: reason.clone() });
            }
            let id = s.next_id;
            s.next_id += 1;
            let replay: Vec<MetricEntry> = if request.buffered {
                s.history.iter().filter(|e| e.kind == request.kind).cloned().collect()
            } else {
                Vec::new()
            };
            s.subs.push(SubEntry { id, kind: request.kind, cb: Arc::clone(&cb) });
            (id, replay)
        };

        if !replay.is_empty() {
            cb(&replay);
        }

        Ok(Box::new(SimSubscription { id, state: Arc::clone(&self.state) }))
    }
}

// --- page state ---

struct PageSnapshot {
    visibility: Visibility,
    scroll_offset: f64,
    viewport_height: f64,
    document_height: f64,
}

impl Default for PageSnapshot {
    fn default() -> Self {
        Self {
            visibility: Visibility::Visible,
            scroll_offset: 0.0,
            viewport_height: 0.0,
            document_height: 0.0,
        }
    }
}

/// Settable visibility and geometry.
#[derive(Default)]
pub struct SimPage {
    state: Mutex<PageSnapshot>,
}

impl PageState for SimPage {
    fn visibility(&self) -> Visibility {
        lock(&self.state).visibility
    }

    fn scroll_offset(&self) -> f64 {
        lock(&self.state).scroll_offset
    }

    fn viewport_height(&self) -> f64 {
        lock(&self.state).viewport_height
    }

    fn document_height(&self) -> f64 {
        lock(&self.state).document_height
    }
}

// --- the bundle ---

/// Deterministic platform for tests and examples.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use defervisor::platform::sim::SimPlatform;
///
/// let sim = SimPlatform::new();
/// let platform = sim.platform();
/// // ... build a controller around `platform`, then drive it:
/// sim.advance(Duration::from_millis(2000));
/// ```
#[derive(Clone, Default)]
pub struct SimPlatform {
    timers: Arc<SimTimers>,
    idle: Arc<SimIdle>,
    observer: Arc<SimObserver>,
    dispatch: Arc<SimDispatcher>,
    page: Arc<SimPage>,
}

impl SimPlatform {
    /// Creates a fresh platform with an empty history and a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full capability bundle (idle and observer included).
    pub fn platform(&self) -> Platform {
        self.platform_bare()
            .with_idle(Arc::clone(&self.idle) as _)
            .with_observer(Arc::clone(&self.observer) as _)
    }

    /// Bundle with only the required capabilities — no idle scheduler, no
    /// metric observer. Used to exercise the degradation paths.
    pub fn platform_bare(&self) -> Platform {
        Platform::new(
            Arc::clone(&self.timers) as _,
            Arc::clone(&self.dispatch) as _,
            Arc::clone(&self.page) as _,
        )
    }

    /// Bundle with an observer but no idle scheduler.
    pub fn platform_without_idle(&self) -> Platform {
        self.platform_bare().with_observer(Arc::clone(&self.observer) as _)
    }

    // --- components ---

    /// Timer component, for composing custom [`Platform`] bundles.
    pub fn timers(&self) -> &Arc<SimTimers> {
        &self.timers
    }

    /// Idle component.
    pub fn idle(&self) -> &Arc<SimIdle> {
        &self.idle
    }

    /// Observer component.
    pub fn observer(&self) -> &Arc<SimObserver> {
        &self.observer
    }

    /// Dispatcher component.
    pub fn dispatcher(&self) -> &Arc<SimDispatcher> {
        &self.dispatch
    }

    /// Page-state component.
    pub fn page(&self) -> &Arc<SimPage> {
        &self.page
    }

    // --- driving ---

    /// Advances the clock, firing due timers in deadline order.
    pub fn advance(&self, by: Duration) {
        self.timers.advance(by);
    }

    /// Delivers all pending idle callbacks.
    pub fn run_idle(&self) {
        self.idle.run();
    }

    /// Delivers a platform event to its registered listeners.
    pub fn dispatch(&self, target: EventTarget, event: PageEvent) {
        self.dispatch.dispatch(target, event);
    }

    /// Records a metric entry, delivering it to matching subscriptions.
    ///
    /// Entries recorded before a buffered subscription are replayed when the
    /// subscription is created.
    pub fn record_metric(&self, entry: MetricEntry) {
        self.observer.record(entry);
    }

    /// Makes subsequent `observe` calls fail with a construction error.
    pub fn fail_observer(&self, reason: &str) {
        self.observer.fail_with(reason);
    }

    // --- page state ---

    /// Sets the visibility state (takes effect on the next read).
    pub fn set_visibility(&self, visibility: Visibility) {
        lock(&self.page.state).visibility = visibility;
    }

    /// Sets the scroll geometry.
    pub fn set_geometry(&self, scroll_offset: f64, viewport_height: f64, document_height: f64) {
        let mut s = lock(&self.page.state);
        s.scroll_offset = scroll_offset;
        s.viewport_height = viewport_height;
        s.document_height = document_height;
    }

    /// Sets the scroll offset and delivers a scroll event.
    pub fn scroll_to(&self, offset: f64) {
        lock(&self.page.state).scroll_offset = offset;
        self.dispatch(EventTarget::Window, PageEvent::Scroll);
    }

    // --- introspection ---

    /// Timers that have neither fired nor been cleared.
    pub fn timers_active(&self) -> usize {
        self.timers.pending()
    }

    /// Idle requests not yet delivered or cancelled.
    pub fn idle_active(&self) -> usize {
        self.idle.pending()
    }

    /// Listeners currently registered.
    pub fn listeners_active(&self) -> usize {
        self.dispatch.active()
    }

    /// Metric subscriptions currently connected.
    pub fn subscriptions_active(&self) -> usize {
        self.observer.active()
    }

    /// Snapshot of current listener registrations (target, event, options).
    pub fn listener_registrations(&self) -> Vec<(EventTarget, PageEvent, ListenerOptions)> {
        self.dispatch.registrations()
    }
}
