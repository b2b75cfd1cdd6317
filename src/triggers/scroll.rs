//! Scroll-depth trigger: fires the first time the scrolled fraction meets
//! the threshold.
//!
//! The fraction is recomputed on every scroll notification; a page already
//! past the threshold fires on its next scroll event, not at attachment.

use std::sync::Arc;

use crate::controller::core::CtrlInner;
use crate::error::ControllerError;
use crate::events::{Event, EventKind, FireSource};
use crate::platform::{EventTarget, ListenerOptions, PageEvent, SignalFn};
use crate::triggers::TriggerKind;

pub(crate) fn attach(
    inner: &Arc<CtrlInner>,
    threshold: Option<f64>,
) -> Result<(), ControllerError> {
    let threshold = threshold.unwrap_or(inner.cfg().scroll_threshold);
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(ControllerError::InvalidThreshold { value: threshold });
    }
    if inner.is_executed() {
        return Ok(());
    }
    inner.publish(Event::new(EventKind::TriggerAttached).with_trigger(TriggerKind::Scroll));

    let weak = Arc::downgrade(inner);
    let cb: SignalFn = Arc::new(move || {
        let Some(inner) = weak.upgrade() else { return };
        let page = inner.platform().page();
        let total = page.document_height();
        if total <= 0.0 {
            return;
        }
        let fraction = (page.scroll_offset() + page.viewport_height()) / total;
        if fraction >= threshold {
            inner.fire(TriggerKind::Scroll, FireSource::Signal);
        }
    });

    let dispatch = Arc::clone(inner.platform().dispatch());
    let handle = dispatch.add_listener(
        EventTarget::Window,
        PageEvent::Scroll,
        cb,
        ListenerOptions::default(),
    );
    inner.add_cleanup(Box::new(move || dispatch.remove_listener(handle)));
    Ok(())
}
