//! # Visibility and geometry capability.
//!
//! Synchronous, readable page state. The visibility trigger consults
//! [`PageState::visibility`] inside its change handler; the scroll trigger
//! derives the scrolled fraction from the three geometry readings.

/// Document visibility state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Page is the foreground, rendered document.
    Visible,
    /// Page is backgrounded or minimized.
    Hidden,
}

/// Readable visibility and scroll geometry.
pub trait PageState: Send + Sync {
    /// Current visibility state.
    fn visibility(&self) -> Visibility;

    /// Current vertical scroll offset.
    fn scroll_offset(&self) -> f64;

    /// Height of the viewport.
    fn viewport_height(&self) -> f64;

    /// Total scrollable height of the document.
    fn document_height(&self) -> f64;
}
