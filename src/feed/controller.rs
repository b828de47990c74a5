//! The feed controller: one parametrized instance per feed screen.
//!
//! Owns the [`FeedStore`], issues provider calls as tokio tasks, and applies
//! their completions back on the caller's thread.  Both the viewport
//! trigger and explicit "load more"/retry go through
//! [`request_next_page`](FeedController::request_next_page), so redundant
//! signals collapse into at most one outstanding request.
//!
//! ## For contributors
//!
//! Completions travel over an unbounded channel and are only applied from
//! [`pump`](FeedController::pump) or [`settle`](FeedController::settle).
//! Never mutate the store from inside the spawned task.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::filter::visible_items;
use super::preview::PreviewOverlay;
use super::store::{FeedStatus, FeedStore, LoadTicket};
use super::trigger::{Signal, Viewport, ViewportTrigger};
use crate::error::ProviderError;
use crate::provider::{Catalog, CategoryId, ContentItem, ContentProvider, ItemId, Page};

/// Per-screen settings.
#[derive(Debug, Clone, Copy)]
pub struct ScreenConfig {
    pub catalog: Catalog,
    pub prefetch_rows: usize,
    pub request_timeout: Duration,
}

impl ScreenConfig {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            prefetch_rows: 1,
            request_timeout: Duration::from_secs(10),
        }
    }
}

struct Completion {
    ticket: LoadTicket,
    result: Result<Page, ProviderError>,
}

/// Owned by the spawned task.  If the task unwinds before reporting (a
/// provider panic), the ticket is failed on drop so the store never stays
/// `Loading`.  Aborted tasks report too; their ticket is already stale.
struct Reporter {
    tx: mpsc::UnboundedSender<Completion>,
    ticket: LoadTicket,
    sent: bool,
}

impl Reporter {
    fn send(mut self, result: Result<Page, ProviderError>) {
        self.sent = true;
        // Fails only when the controller is gone.
        let _ = self.tx.send(Completion {
            ticket: self.ticket,
            result,
        });
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if !self.sent {
            let _ = self.tx.send(Completion {
                ticket: self.ticket,
                result: Err(ProviderError::Unavailable(
                    "provider task ended without a result".into(),
                )),
            });
        }
    }
}

pub struct FeedController {
    config: ScreenConfig,
    provider: Arc<dyn ContentProvider>,
    store: FeedStore,
    selected: CategoryId,
    trigger: ViewportTrigger,
    preview: PreviewOverlay,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: Option<JoinHandle<()>>,
}

impl FeedController {
    pub fn new(config: ScreenConfig, provider: Arc<dyn ContentProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config,
            provider,
            store: FeedStore::new(),
            selected: CategoryId::ALL,
            trigger: ViewportTrigger::new(config.prefetch_rows),
            preview: PreviewOverlay::default(),
            tx,
            rx,
            in_flight: None,
        }
    }

    // -- lifecycle -----------------------------------------------------------

    /// Activate the screen: reset the feed and request the first page.
    pub fn initialize(&mut self) {
        self.abort_in_flight();
        self.store.reset();
        self.selected = CategoryId::ALL;
        self.preview.close();
        self.trigger.attach();
        info!(feed = self.config.catalog.title(), "feed initialized");
        self.request_next_page();
    }

    /// Deactivate the screen.  Any outstanding request is cancelled and its
    /// result, should it still arrive, is discarded.
    pub fn teardown(&mut self) {
        self.trigger.detach();
        self.store.detach();
        self.preview.close();
        self.abort_in_flight();
        debug!(feed = self.config.catalog.title(), "feed torn down");
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    // -- loading -------------------------------------------------------------

    /// Ask for the next page.  Returns `false` without side effects while a
    /// page is already loading or the screen is torn down.
    pub fn request_next_page(&mut self) -> bool {
        let Some(ticket) = self.store.begin_load() else {
            debug!(
                feed = self.config.catalog.title(),
                status = ?self.store.status(),
                "next page request ignored"
            );
            return false;
        };

        info!(
            feed = self.config.catalog.title(),
            provider = self.provider.name(),
            cursor = %ticket.cursor,
            "requesting page"
        );

        let provider = Arc::clone(&self.provider);
        let reporter = Reporter {
            tx: self.tx.clone(),
            ticket,
            sent: false,
        };
        let timeout = self.config.request_timeout;
        self.in_flight = Some(tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, provider.fetch_page(ticket.cursor)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(timeout)),
            };
            reporter.send(result);
        }));
        true
    }

    /// Re-issue the request for the current cursor after a failure.
    pub fn retry(&mut self) -> bool {
        self.request_next_page()
    }

    /// React to a signal from the viewport trigger.
    pub fn on_continue(&mut self, signal: Signal) -> bool {
        match signal {
            Signal::Continue => self.request_next_page(),
        }
    }

    /// Feed the viewport of the last rendered frame to the trigger.  The
    /// sentinel sits right after the last visible item.
    pub fn observe_viewport(&mut self, viewport: Viewport) -> bool {
        let sentinel = self.visible_items().len();
        match self.trigger.observe(viewport, sentinel) {
            Some(signal) => self.on_continue(signal),
            None => false,
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    /// Returns how many changed the feed.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the outstanding request and apply it.  Returns `false`
    /// immediately when nothing is loading.
    pub async fn settle(&mut self) -> bool {
        while self.store.is_live() && self.store.status() == FeedStatus::Loading {
            let Some(completion) = self.rx.recv().await else {
                return false;
            };
            if self.apply(completion) {
                return true;
            }
        }
        false
    }

    fn apply(&mut self, completion: Completion) -> bool {
        let Completion { ticket, result } = completion;
        let outcome = result.as_ref().map(|page| page.items.len()).map_err(Clone::clone);

        if !self.store.complete(ticket, result) {
            debug!(
                feed = self.config.catalog.title(),
                cursor = %ticket.cursor,
                "discarding stale page"
            );
            return false;
        }

        self.in_flight = None;
        match outcome {
            Ok(count) => {
                info!(
                    feed = self.config.catalog.title(),
                    cursor = %ticket.cursor,
                    count,
                    total = self.store.items().len(),
                    "page loaded"
                );
                self.trigger.rearm();
            }
            Err(e) => {
                warn!(
                    feed = self.config.catalog.title(),
                    cursor = %ticket.cursor,
                    error = %e,
                    "page load failed"
                );
            }
        }
        true
    }

    // -- presentation --------------------------------------------------------

    pub fn catalog(&self) -> Catalog {
        self.config.catalog
    }

    pub fn items(&self) -> &[ContentItem] {
        self.store.items()
    }

    pub fn visible_items(&self) -> Vec<&ContentItem> {
        visible_items(self.store.items(), self.selected)
    }

    pub fn status(&self) -> FeedStatus {
        self.store.status()
    }

    pub fn is_loading(&self) -> bool {
        self.store.status() == FeedStatus::Loading
    }

    pub fn has_failed(&self) -> bool {
        self.store.status() == FeedStatus::Failed
    }

    pub fn last_error(&self) -> Option<&ProviderError> {
        self.store.last_error()
    }

    pub fn selected_category(&self) -> CategoryId {
        self.selected
    }

    /// Change the visible subset.  Never triggers a load.  Returns `false`
    /// for a category this screen does not offer.
    pub fn select_category(&mut self, id: CategoryId) -> bool {
        let offered = id.is_all() || (id.0 as usize) < self.config.catalog.categories().len();
        if !offered {
            return false;
        }
        if self.selected != id {
            debug!(feed = self.config.catalog.title(), category = %id, "category selected");
        }
        self.selected = id;
        true
    }

    /// Show `item_id` full-size, replacing any open preview.  Ignored for
    /// ids that are not loaded.
    pub fn open_preview(&mut self, item_id: ItemId) -> bool {
        if !self.store.items().iter().any(|item| item.id == item_id) {
            return false;
        }
        self.preview.open(item_id, Instant::now());
        true
    }

    pub fn close_preview(&mut self) {
        self.preview.close();
    }

    pub fn preview(&self) -> &PreviewOverlay {
        &self.preview
    }

    pub fn previewed_item(&self) -> Option<&ContentItem> {
        let id = self.preview.item_id()?;
        self.store.items().iter().find(|item| item.id == id)
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
