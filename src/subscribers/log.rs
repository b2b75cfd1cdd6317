//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints controller events to stdout in a human-readable
//! format. Primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [armed]
//! [attached] trigger=lcp guard=3000ms
//! [observer-unavailable] trigger=fcp reason="absent"
//! [fired] trigger=lcp via=guard
//! [task-done] task=hydrate-widgets
//! [task-failed] task=beacon reason="execution failed: 503"
//! [aborted]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind, FireSource};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`Subscribe`] for structured logging or metrics.
pub struct LogWriter;

fn label(trigger: Option<crate::triggers::TriggerKind>) -> &'static str {
    trigger.map(|t| t.as_label()).unwrap_or("?")
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ControllerArmed => println!("[armed]"),
            EventKind::TriggerAttached => match e.delay_ms {
                Some(ms) => println!("[attached] trigger={} guard={}ms", label(e.trigger), ms),
                None => println!("[attached] trigger={}", label(e.trigger)),
            },
            EventKind::ObserverUnavailable => {
                println!(
                    "[observer-unavailable] trigger={} reason={:?}",
                    label(e.trigger),
                    e.reason.as_deref().unwrap_or("?")
                );
            }
            EventKind::TriggerFired => {
                let via = match e.fire_source {
                    Some(FireSource::Guard) => "guard",
                    _ => "signal",
                };
                println!("[fired] trigger={} via={via}", label(e.trigger));
            }
            EventKind::TaskCompleted => {
                println!("[task-done] task={}", e.task.as_deref().unwrap_or("?"));
            }
            EventKind::TaskFailed => {
                println!(
                    "[task-failed] task={} reason={:?}",
                    e.task.as_deref().unwrap_or("?"),
                    e.reason.as_deref().unwrap_or("?")
                );
            }
            EventKind::CleanupFailed => {
                println!("[cleanup-failed] reason={:?}", e.reason.as_deref().unwrap_or("?"));
            }
            EventKind::ControllerAborted => println!("[aborted]"),
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
