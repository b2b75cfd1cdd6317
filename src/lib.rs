//! # defervisor
//!
//! **Defervisor** is a lightweight deferred-execution library for Rust.
//!
//! It wraps a single task and runs it **at most once** when the first of
//! several readiness signals fires: host idle capacity, a delay, paint
//! milestones (first/largest contentful paint), user interaction, page
//! visibility, or scroll depth. Page authors use it to schedule
//! non-critical work (analytics beacons, widget hydration, cache warming)
//! without blocking initial render.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!    Controller::new(platform, task)
//!        │
//!        │ .when(Idle) / .after(Delay|Lcp|Fcp|Interaction) / .on(...)
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Controller (shared core)                                         │
//! │  - Lifecycle: Idle ──► Armed ──► Executed (terminal)              │
//! │  - Cleanup registry (append-only, consumed atomically on fire)    │
//! │  - Bus (broadcast diagnostic events)                              │
//! └──────┬──────────────┬──────────────┬──────────────┬───────┬──────┘
//!        ▼              ▼              ▼              ▼       ▼
//!   IdleScheduler  TimerScheduler  MetricObserver  Event    PageState
//!   (optional)     (always)        (optional)      Dispatch (sync reads)
//!        │              │              │              │
//!        │  idle cb     │  timer cb    │  entry cb    │  listener cb
//!        └──────────────┴──────┬───────┴──────────────┘
//!                              ▼
//!                    fire(trigger, via)        first caller wins
//!                              │
//!                    run every cleanup         best-effort, total
//!                              │
//!                    run the task              at most once, errors
//!                              │               captured, never re-raised
//!                              ▼
//!                    Bus ──► events() receivers / SubscriberSet
//! ```
//!
//! ### Lifecycle
//! ```text
//! create ──► attach trigger(s) ──► (platform signal fires) ──► run-once ──► cleanup-all
//!
//! - every open-ended signal (idle, paint, awaited interaction) races a
//!   bounded guard timer, so an armed controller reaches Executed in
//!   bounded time even under total signal absence;
//! - there is no scheduler loop; the controller is purely reactive to
//!   externally delivered callbacks;
//! - abort() takes the cleanup-without-execution path for callers that
//!   discard a controller before any trigger fires.
//! ```
//!
//! ## Features
//! | Area | Description | Key types / traits |
//! |------|-------------|--------------------|
//! | **Triggers** | Three registration families racing toward one fire. | [`When`], [`After`], [`On`] |
//! | **Platform** | Capability traits injected at construction. | [`Platform`], [`platform`] |
//! | **Tasks** | The unit of deferred work. | [`DeferredTask`], [`TaskFn`], [`TaskRef`] |
//! | **Events** | Diagnostic stream over a broadcast bus. | [`Event`], [`EventKind`], [`Subscribe`] |
//! | **Errors** | Typed errors at the controller boundary. | [`ControllerError`], [`TaskError`] |
//! | **Testing** | Deterministic in-memory platform. | [`platform::sim::SimPlatform`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` stdout subscriber
//!   _(demo/reference only)_.
//!
//! ## Example
//! ```
//! # fn main() -> Result<(), defervisor::ControllerError> {
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use defervisor::platform::sim::SimPlatform;
//! use defervisor::{After, Controller, TaskError, TaskFn, TaskRef, When};
//!
//! let sim = SimPlatform::new();
//!
//! let runs = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&runs);
//! let task: TaskRef = TaskFn::arc("analytics", move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok::<_, TaskError>(())
//! });
//!
//! // Race host idleness against a 100ms delay; first one wins.
//! let ctrl = Controller::new(sim.platform(), task);
//! ctrl.when(When::idle())?
//!     .after(After::Delay(Duration::from_millis(100)))?;
//!
//! sim.advance(Duration::from_millis(100));
//! assert_eq!(runs.load(Ordering::SeqCst), 1);
//! assert!(ctrl.lifecycle().is_executed());
//!
//! // The loser was torn down with the winner; nothing fires twice.
//! sim.run_idle();
//! sim.advance(Duration::from_millis(5000));
//! assert_eq!(runs.load(Ordering::SeqCst), 1);
//! # Ok(())
//! # }
//! ```

mod config;
mod controller;
mod error;
mod tasks;
mod triggers;

pub mod events;
pub mod platform;
pub mod subscribers;

// ---- Public re-exports ----

pub use config::ControllerConfig;
pub use controller::{Controller, ControllerBuilder, Lifecycle};
pub use error::{ControllerError, ObserverError, TaskError};
pub use events::{Event, EventKind, FireSource};
pub use platform::Platform;
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{DeferredTask, TaskFn, TaskRef};
pub use triggers::{After, On, TriggerKind, When};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
