//! Paint-milestone triggers: LCP and FCP observation with a forced-fire
//! guard.
//!
//! The guard timer is registered before the observation is attempted, so
//! the trigger stays bounded even when the observer capability is absent or
//! refuses the subscription. Observation is buffered: a milestone recorded
//! before attachment still fires the trigger.

use std::sync::Arc;

use crate::controller::core::CtrlInner;
use crate::events::{Event, EventKind, FireSource};
use crate::platform::{
    EntryFn, MetricEntry, MetricKind, ObserveRequest, FIRST_CONTENTFUL_PAINT,
};
use crate::triggers::TriggerKind;

pub(crate) fn attach_lcp(inner: &Arc<CtrlInner>) {
    attach_paint(
        inner,
        TriggerKind::Lcp,
        ObserveRequest { kind: MetricKind::LargestContentfulPaint, buffered: true },
        |entries| !entries.is_empty(),
    );
}

pub(crate) fn attach_fcp(inner: &Arc<CtrlInner>) {
    attach_paint(
        inner,
        TriggerKind::Fcp,
        ObserveRequest { kind: MetricKind::Paint, buffered: true },
        |entries| entries.iter().any(|e| &*e.name == FIRST_CONTENTFUL_PAINT),
    );
}

fn attach_paint(
    inner: &Arc<CtrlInner>,
    trigger: TriggerKind,
    request: ObserveRequest,
    qualifies: fn(&[MetricEntry]) -> bool,
) {
    if inner.is_executed() {
        return;
    }
    let guard = inner.cfg().paint_guard;
    inner.publish(
        Event::new(EventKind::TriggerAttached)
            .with_trigger(trigger)
            .with_delay(guard),
    );

    // Guard first: a buffered observation may deliver (and fire) from inside
    // observe(), and the guard must already be registered for teardown.
    let timers = Arc::clone(inner.platform().timers());
    let handle = timers.set_timer(inner.signal_fn(trigger, FireSource::Guard), guard);
    inner.add_cleanup(Box::new(move || timers.clear_timer(handle)));

    let Some(observer) = inner.platform().observer() else {
        inner.publish(
            Event::new(EventKind::ObserverUnavailable)
                .with_trigger(trigger)
                .with_reason("absent"),
        );
        return;
    };

    let fire = inner.signal_fn(trigger, FireSource::Signal);
    let cb: EntryFn = Arc::new(move |entries: &[MetricEntry]| {
        if qualifies(entries) {
            fire();
        }
    });

    match observer.observe(request, cb) {
        Ok(subscription) => inner.add_cleanup(Box::new(move || subscription.disconnect())),
        Err(err) => inner.publish(
            Event::new(EventKind::ObserverUnavailable)
                .with_trigger(trigger)
                .with_reason(err.as_message()),
        ),
    }
}
