//! Idle trigger: host idle capacity raced against a guard timer.

use std::sync::Arc;
use std::time::Duration;

use crate::controller::core::CtrlInner;
use crate::events::{Event, EventKind, FireSource};
use crate::triggers::TriggerKind;

/// Attaches the idle race: an idle request (if the capability is present)
/// and the guard timer, both torn down in the same transition whichever
/// fires first.
pub(crate) fn attach(inner: &Arc<CtrlInner>, timeout: Option<Duration>) {
    if inner.is_executed() {
        return;
    }
    let timeout = timeout.unwrap_or(inner.cfg().idle_timeout);
    inner.publish(
        Event::new(EventKind::TriggerAttached)
            .with_trigger(TriggerKind::Idle)
            .with_delay(timeout),
    );

    if let Some(idle) = inner.platform().idle() {
        let handle = idle.request_idle(inner.signal_fn(TriggerKind::Idle, FireSource::Signal));
        let idle = Arc::clone(idle);
        inner.add_cleanup(Box::new(move || idle.cancel_idle(handle)));
    }

    let timers = Arc::clone(inner.platform().timers());
    let handle = timers.set_timer(inner.signal_fn(TriggerKind::Idle, FireSource::Guard), timeout);
    inner.add_cleanup(Box::new(move || timers.clear_timer(handle)));
}
