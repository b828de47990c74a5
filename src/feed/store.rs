//! Feed state: the accumulated items, the page cursor, and load status.
//!
//! The store is a synchronous state machine.  Starting a load hands out a
//! [`LoadTicket`]; only a completion carrying the ticket of the current,
//! still-owned session is applied.  Everything asynchronous lives in the
//! controller.

use crate::error::ProviderError;
use crate::provider::{ContentItem, Cursor, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Proof that a load was started, and which one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub session: u64,
    pub cursor: Cursor,
}

#[derive(Debug)]
pub struct FeedStore {
    items: Vec<ContentItem>,
    cursor: Cursor,
    status: FeedStatus,
    /// Incremented on every reset; tickets from older sessions are stale.
    session: u64,
    /// False once the owning screen is torn down.
    live: bool,
    last_error: Option<ProviderError>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: Cursor::FIRST,
            status: FeedStatus::Idle,
            session: 0,
            live: false,
            last_error: None,
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn last_error(&self) -> Option<&ProviderError> {
        self.last_error.as_ref()
    }

    /// Start a fresh session: empty items, first cursor, `Idle`.
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = Cursor::FIRST;
        self.status = FeedStatus::Idle;
        self.session += 1;
        self.live = true;
        self.last_error = None;
    }

    /// Mark the store as ownerless.  State is left as-is and no later
    /// completion is applied until the next [`reset`](Self::reset).
    pub fn detach(&mut self) {
        self.live = false;
    }

    /// Enter `Loading` and return the ticket for the request to issue.
    ///
    /// Returns `None` (and changes nothing) while a load is in flight or
    /// when the store has no live owner.  A `Failed` store retries from
    /// the same cursor.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if !self.live || self.status == FeedStatus::Loading {
            return None;
        }
        self.status = FeedStatus::Loading;
        Some(LoadTicket {
            session: self.session,
            cursor: self.cursor,
        })
    }

    /// Apply the outcome of the load identified by `ticket`.
    ///
    /// Returns `false` if the ticket is stale, in which case nothing is
    /// touched.  On success the batch is appended and the cursor advanced;
    /// on failure only the status changes.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<Page, ProviderError>) -> bool {
        let current = self.live
            && self.status == FeedStatus::Loading
            && ticket.session == self.session
            && ticket.cursor == self.cursor;
        if !current {
            return false;
        }

        match result {
            Ok(page) => {
                self.items.extend(page.items);
                self.cursor = page.next_cursor;
                self.status = FeedStatus::Loaded;
                self.last_error = None;
            }
            Err(e) => {
                self.status = FeedStatus::Failed;
                self.last_error = Some(e);
            }
        }
        true
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}
