//! Interaction triggers.
//!
//! Two registration shapes share the kind:
//! - **awaited** (`after(Interaction)`) — pointer-down / click / key-down /
//!   touch-start, passive + capturing so the page is never blocked, all four
//!   detached together by whichever path fires, with a forced-fire guard;
//! - **direct** (`on(Interaction)`) — click / key-down / touch-start, each
//!   self-removing, no guard.

use std::sync::Arc;

use crate::controller::core::CtrlInner;
use crate::events::{Event, EventKind, FireSource};
use crate::platform::{EventTarget, ListenerOptions, PageEvent};
use crate::triggers::TriggerKind;

const AWAITED_EVENTS: [PageEvent; 4] = [
    PageEvent::PointerDown,
    PageEvent::Click,
    PageEvent::KeyDown,
    PageEvent::TouchStart,
];

const DIRECT_EVENTS: [PageEvent; 3] =
    [PageEvent::Click, PageEvent::KeyDown, PageEvent::TouchStart];

pub(crate) fn attach_awaited(inner: &Arc<CtrlInner>) {
    if inner.is_executed() {
        return;
    }
    let guard = inner.cfg().interaction_guard;
    inner.publish(
        Event::new(EventKind::TriggerAttached)
            .with_trigger(TriggerKind::Interaction)
            .with_delay(guard),
    );

    let dispatch = Arc::clone(inner.platform().dispatch());
    let fire = inner.signal_fn(TriggerKind::Interaction, FireSource::Signal);
    let handles: Vec<_> = AWAITED_EVENTS
        .iter()
        .map(|&event| {
            dispatch.add_listener(
                EventTarget::Window,
                event,
                Arc::clone(&fire),
                ListenerOptions::passive_capture(),
            )
        })
        .collect();
    inner.add_cleanup(Box::new(move || {
        for handle in handles {
            dispatch.remove_listener(handle);
        }
    }));

    let timers = Arc::clone(inner.platform().timers());
    let handle =
        timers.set_timer(inner.signal_fn(TriggerKind::Interaction, FireSource::Guard), guard);
    inner.add_cleanup(Box::new(move || timers.clear_timer(handle)));
}

pub(crate) fn attach_direct(inner: &Arc<CtrlInner>) {
    if inner.is_executed() {
        return;
    }
    inner.publish(Event::new(EventKind::TriggerAttached).with_trigger(TriggerKind::Interaction));

    let fire = inner.signal_fn(TriggerKind::Interaction, FireSource::Signal);
    for &event in &DIRECT_EVENTS {
        let dispatch = Arc::clone(inner.platform().dispatch());
        let handle = dispatch.add_listener(
            EventTarget::Window,
            event,
            Arc::clone(&fire),
            ListenerOptions::once(),
        );
        // The dispatcher may have detached the listener already (once);
        // removal of an expired handle is a no-op by contract.
        inner.add_cleanup(Box::new(move || dispatch.remove_listener(handle)));
    }
}
