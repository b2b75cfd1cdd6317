//! Controller events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to diagnostic events emitted by the controller's
//! attach, fire, and abort paths.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`FireSource`] event classification and
//!   payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: the controller core (arming, attachment, fire,
//!   task outcome, teardown failures, capability degradation).
//! - **Consumers**: `Controller::events()` receivers, and the builder's
//!   subscriber listener feeding a
//!   [`SubscriberSet`](crate::subscribers::SubscriberSet).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, FireSource};
