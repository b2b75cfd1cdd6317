//! # Performance-metric observation capability.
//!
//! Paint-milestone triggers (`LargestContentfulPaint`,
//! `FirstContentfulPaint`) subscribe here. The capability may be absent
//! entirely, and a present capability may still refuse a subscription
//! ([`ObserverError`]); both degradations are swallowed at the attachment
//! site and the trigger falls back to its guard timer.

use std::sync::Arc;

use crate::error::ObserverError;

/// Entry name of the first-contentful-paint metric within the `Paint`
/// entry stream.
pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

/// Performance entry types a subscription can observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Largest-contentful-paint entries.
    LargestContentfulPaint,
    /// Paint entries (first-paint, first-contentful-paint).
    Paint,
}

/// A single observed performance entry.
#[derive(Clone, Debug)]
pub struct MetricEntry {
    /// Entry name (e.g. `"first-contentful-paint"`).
    pub name: Arc<str>,
    /// Entry type this entry belongs to.
    pub kind: MetricKind,
}

impl MetricEntry {
    /// Creates an entry of the given type and name.
    pub fn new(kind: MetricKind, name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into(), kind }
    }
}

/// Subscription request.
#[derive(Clone, Copy, Debug)]
pub struct ObserveRequest {
    /// Entry type to observe.
    pub kind: MetricKind,
    /// When true, entries recorded before the subscription are replayed to
    /// the callback immediately (late subscription still sees the past).
    pub buffered: bool,
}

/// Callback receiving a batch of observed entries.
pub type EntryFn = Arc<dyn Fn(&[MetricEntry]) + Send + Sync>;

/// Live subscription; dropping it does not detach, call
/// [`disconnect`](MetricSubscription::disconnect).
pub trait MetricSubscription: Send + Sync {
    /// Detaches the subscription. Idempotent.
    fn disconnect(&self);
}

/// Performance-entry observation.
pub trait MetricObserver: Send + Sync {
    /// Subscribes `cb` to entries matching the request.
    ///
    /// Returns an error when the capability cannot construct the
    /// subscription (e.g. unsupported entry type). Callers inside the
    /// controller swallow that error and degrade to a guard timer.
    fn observe(
        &self,
        request: ObserveRequest,
        cb: EntryFn,
    ) -> Result<Box<dyn MetricSubscription>, ObserverError>;
}
