//! Full-size preview of one item.
//!
//! Two states only.  Opening while open replaces the shown item.  The enter
//! transition is derived from the time the overlay opened and is purely
//! presentational.

use std::time::{Duration, Instant};

use crate::provider::ItemId;

pub const ENTER_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewOverlay {
    #[default]
    Closed,
    Open { item_id: ItemId, opened_at: Instant },
}

impl PreviewOverlay {
    pub fn open(&mut self, item_id: ItemId, now: Instant) {
        *self = PreviewOverlay::Open {
            item_id,
            opened_at: now,
        };
    }

    pub fn close(&mut self) {
        *self = PreviewOverlay::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PreviewOverlay::Open { .. })
    }

    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            PreviewOverlay::Open { item_id, .. } => Some(*item_id),
            PreviewOverlay::Closed => None,
        }
    }

    /// Fraction of the enter transition completed at `now`, in `[0, 1]`.
    /// A closed overlay reports 0.
    pub fn enter_progress(&self, now: Instant) -> f32 {
        match self {
            PreviewOverlay::Open { opened_at, .. } => {
                let elapsed = now.saturating_duration_since(*opened_at);
                (elapsed.as_secs_f32() / ENTER_TRANSITION.as_secs_f32()).min(1.0)
            }
            PreviewOverlay::Closed => 0.0,
        }
    }
}
