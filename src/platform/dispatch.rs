//! # Event-dispatch capability.
//!
//! Interaction, visibility, and scroll triggers register listeners here.
//! Listener identity is handle-based: closures have no identity in Rust, so
//! `add_listener` returns a [`ListenerHandle`] and removal takes the handle.
//! Removing an expired or unknown handle is a no-op — the self-removing
//! `once` listeners of `on(Interaction)` rely on this.

use super::SignalFn;

/// Where a listener is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The top-level window / viewport.
    Window,
    /// The document (visibility-change notifications originate here).
    Document,
}

/// Platform event kinds the triggers subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageEvent {
    /// Pointer pressed (mouse, pen, touch).
    PointerDown,
    /// Click completed.
    Click,
    /// Key pressed.
    KeyDown,
    /// Touch started.
    TouchStart,
    /// Viewport scrolled.
    Scroll,
    /// Document visibility state changed.
    VisibilityChange,
}

/// Listener registration options.
///
/// Defaults mirror plain registration: not passive, bubble phase, persistent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Listener promises not to block default handling.
    pub passive: bool,
    /// Register for the capture phase.
    pub capture: bool,
    /// Self-removing: the dispatcher detaches the listener after its first
    /// delivery.
    pub once: bool,
}

impl ListenerOptions {
    /// Passive + capturing listener that can never block the page —
    /// the registration used by the awaited-interaction trigger.
    pub fn passive_capture() -> Self {
        Self { passive: true, capture: true, once: false }
    }

    /// Self-removing listener.
    pub fn once() -> Self {
        Self { passive: false, capture: false, once: true }
    }
}

/// Opaque handle identifying a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    /// Creates a handle from a capability-assigned id.
    pub fn new(id: u64) -> Self {
        ListenerHandle(id)
    }

    /// The capability-assigned id.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Event listener registration.
pub trait EventDispatcher: Send + Sync {
    /// Registers `cb` for the given event on the given target.
    fn add_listener(
        &self,
        target: EventTarget,
        event: PageEvent,
        cb: SignalFn,
        opts: ListenerOptions,
    ) -> ListenerHandle;

    /// Removes a listener. No-op if the handle is expired or unknown.
    fn remove_listener(&self, handle: ListenerHandle);
}
