//! Delay trigger: a plain one-shot timer. The delay is the trigger itself,
//! so there is no separate guard.

use std::sync::Arc;
use std::time::Duration;

use crate::controller::core::CtrlInner;
use crate::events::{Event, EventKind, FireSource};
use crate::triggers::TriggerKind;

pub(crate) fn attach(inner: &Arc<CtrlInner>, delay: Duration) {
    if inner.is_executed() {
        return;
    }
    inner.publish(
        Event::new(EventKind::TriggerAttached)
            .with_trigger(TriggerKind::Delay)
            .with_delay(delay),
    );

    let timers = Arc::clone(inner.platform().timers());
    let handle = timers.set_timer(inner.signal_fn(TriggerKind::Delay, FireSource::Signal), delay);
    inner.add_cleanup(Box::new(move || timers.clear_timer(handle)));
}
