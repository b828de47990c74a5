//! Content provider abstraction layer.
//!
//! This module defines the [`ContentProvider`] trait, the [`Page`] it
//! returns, and the [`ContentItem`] type.  Concrete backends live in
//! sub-modules: [`mock`] generates pages locally after a simulated delay,
//! [`http`] fetches them from a JSON endpoint.
//!
//! ## Adding a new backend
//!
//! 1. Create a new file in this directory (e.g. `sqlite.rs`).
//! 2. Define a struct and implement [`ContentProvider`] for it.
//! 3. Add `mod sqlite;` below and re-export your struct.
//! 4. Construct it in `main.rs` when building the screens.
//!
//! The controller, filter and UI are all provider-agnostic.

mod content_item;
mod http;
mod mock;

pub use content_item::{Aspect, CategoryId, ContentItem, ItemId, MediaKind, Metrics};
pub use http::HttpProvider;
pub use mock::{Catalog, MockProvider};

#[cfg(test)]
pub(crate) use content_item::tests::make_item;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Identifies the next page to request.  Pages are numbered from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub u32);

impl Cursor {
    pub const FIRST: Cursor = Cursor(0);

    pub fn next(self) -> Cursor {
        Cursor(self.0.saturating_add(1))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One batch of items plus the cursor to request after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<ContentItem>,
    pub next_cursor: Cursor,
}

/// Trait that every content backend must implement.
///
/// The controller calls [`fetch_page()`](ContentProvider::fetch_page) from a
/// spawned task, so implementations must be `Send + Sync`.  A call may be
/// slow and may fail; the controller guarantees at most one outstanding
/// call per feed.
///
/// ## Implementing a new backend
///
/// ```ignore
/// pub struct MyProvider { /* config fields */ }
///
/// #[async_trait]
/// impl ContentProvider for MyProvider {
///     fn name(&self) -> &str { "my-provider" }
///
///     async fn fetch_page(&self, cursor: Cursor) -> Result<Page, ProviderError> {
///         // Perform I/O, then convert into ContentItem values.
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Human-readable label used in logs and the status bar.
    fn name(&self) -> &str;

    /// Fetch the page identified by `cursor`.
    ///
    /// Items are expected newest-first across the whole feed: each page is
    /// sorted, and no item is newer than the oldest item of the page before
    /// it.  The controller appends pages as-is.
    async fn fetch_page(&self, cursor: Cursor) -> Result<Page, ProviderError>;
}
