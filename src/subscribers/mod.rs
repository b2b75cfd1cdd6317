//! # Event subscribers for the controller's diagnostic stream.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out used when subscribers are registered through the
//! [`ControllerBuilder`](crate::ControllerBuilder).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Controller ── publish(Event) ──► Bus ──► builder's listener task
//!                                               │
//!                                               ▼
//!                                        SubscriberSet::emit(&Event)
//!                                   ┌─────────┼─────────┐
//!                                   ▼         ▼         ▼
//!                               [queue S1] [queue S2] [queue SN]
//!                                   ▼         ▼         ▼
//!                               worker S1 worker S2 worker SN
//!                                   ▼         ▼         ▼
//!                              on_event()  on_event()  on_event()
//! ```
//!
//! Subscribers are optional; `Controller::events()` exposes the raw bus
//! receiver for callers that prefer to consume events directly.

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
