//! Viewport-driven continuation.
//!
//! The list renders a sentinel row after the last visible item.  After
//! each frame the renderer reports the list's [`Viewport`]; the trigger
//! emits [`Signal::Continue`] when the sentinel comes into view.  It knows
//! nothing about loading: the controller gates redundant signals.

/// The scrolled window of a rendered list, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Index of the first row on screen.
    pub offset: usize,
    /// Number of rows that fit on screen.
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
}

#[derive(Debug)]
pub struct ViewportTrigger {
    /// Rows below the viewport at which the sentinel already counts as visible.
    prefetch_rows: usize,
    was_visible: bool,
    detached: bool,
}

impl ViewportTrigger {
    pub fn new(prefetch_rows: usize) -> Self {
        Self {
            prefetch_rows,
            was_visible: false,
            detached: true,
        }
    }

    /// Start observing.  The next observation of a visible sentinel fires.
    pub fn attach(&mut self) {
        self.detached = false;
        self.was_visible = false;
    }

    /// Stop observing; no signal is emitted until [`attach`](Self::attach).
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Forget that the sentinel was visible, so a sentinel that is still on
    /// screen fires again on the next observation.
    pub fn rearm(&mut self) {
        self.was_visible = false;
    }

    /// Whether row `sentinel` is within `viewport` (plus the prefetch margin).
    pub fn is_visible(&self, viewport: Viewport, sentinel: usize) -> bool {
        sentinel >= viewport.offset
            && sentinel < viewport.offset + viewport.height + self.prefetch_rows
    }

    /// Record one frame's viewport; emit on the not-visible → visible edge.
    pub fn observe(&mut self, viewport: Viewport, sentinel: usize) -> Option<Signal> {
        if self.detached || viewport.height == 0 {
            return None;
        }
        let visible = self.is_visible(viewport, sentinel);
        let fired = visible && !self.was_visible;
        self.was_visible = visible;
        fired.then_some(Signal::Continue)
    }
}
