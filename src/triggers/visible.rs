//! Visibility trigger: fires the first time the page reports the
//! foreground-visible state.

use std::sync::Arc;

use crate::controller::core::CtrlInner;
use crate::events::{Event, EventKind, FireSource};
use crate::platform::{EventTarget, ListenerOptions, PageEvent, SignalFn, Visibility};
use crate::triggers::TriggerKind;

pub(crate) fn attach(inner: &Arc<CtrlInner>) {
    if inner.is_executed() {
        return;
    }
    inner.publish(Event::new(EventKind::TriggerAttached).with_trigger(TriggerKind::Visible));

    let weak = Arc::downgrade(inner);
    let cb: SignalFn = Arc::new(move || {
        let Some(inner) = weak.upgrade() else { return };
        if inner.platform().page().visibility() == Visibility::Visible {
            inner.fire(TriggerKind::Visible, FireSource::Signal);
        }
    });

    let dispatch = Arc::clone(inner.platform().dispatch());
    let handle = dispatch.add_listener(
        EventTarget::Document,
        PageEvent::VisibilityChange,
        cb,
        ListenerOptions::default(),
    );
    inner.add_cleanup(Box::new(move || dispatch.remove_listener(handle)));
}
