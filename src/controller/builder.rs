//! Builder for constructing a [`Controller`] with optional features.

use std::sync::Arc;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::events::Bus;
use crate::platform::Platform;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::tasks::TaskRef;

use super::Controller;

/// Builder for a deferred-task controller.
///
/// The task is the only required piece; [`build`](ControllerBuilder::build)
/// fails with [`ControllerError::MissingTask`] without one, and no
/// controller is produced.
pub struct ControllerBuilder {
    platform: Platform,
    cfg: ControllerConfig,
    task: Option<TaskRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ControllerBuilder {
    pub(crate) fn new(platform: Platform) -> Self {
        Self {
            platform,
            cfg: ControllerConfig::default(),
            task: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the task to defer.
    pub fn task(mut self, task: TaskRef) -> Self {
        self.task = Some(task);
        self
    }

    /// Overrides the default configuration.
    pub fn config(mut self, cfg: ControllerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive controller events (arming, firing, task outcome,
    /// degradations) through dedicated workers with bounded queues. When any
    /// are present, `build()` spawns the listener task and must therefore be
    /// called from within a tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the controller.
    ///
    /// # Errors
    /// [`ControllerError::MissingTask`] if no task was provided.
    pub fn build(self) -> Result<Controller, ControllerError> {
        let task = self.task.ok_or(ControllerError::MissingTask)?;
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers);
            let mut rx = bus.subscribe();
            tokio::spawn(async move {
                while let Ok(ev) = rx.recv().await {
                    set.emit(&ev);
                }
            });
        }

        Ok(Controller::from_parts(self.platform, self.cfg, bus, task))
    }
}
