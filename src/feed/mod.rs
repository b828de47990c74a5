//! Incremental feed loading.
//!
//! * **`store`**: accumulated items, cursor and load status.
//! * **`filter`**: the category-filtered view of the loaded items.
//! * **`trigger`**: turns rendered viewports into "continue" signals.
//! * **`preview`**: the full-size overlay for one item.
//! * **`controller`**: wires the above together for one screen.

mod controller;
mod filter;
mod preview;
mod store;
mod trigger;

pub use controller::{FeedController, ScreenConfig};
pub use store::FeedStatus;
pub use trigger::Viewport;
