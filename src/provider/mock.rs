//! Locally generated content provider.
//!
//! Produces pages of plausible photography items after a fixed simulated
//! latency.  This is the default backend and the one the tests lean on.
//!
//! ## For contributors
//!
//! Generation is driven by a seedable RNG so a run can be reproduced with
//! `--seed`.  Ids and timestamps are both derived from the cursor: ids stay
//! unique across pages, and page `n` only holds items from the window
//! `(epoch - (n+1)*PAGE_WINDOW, epoch - n*PAGE_WINDOW]`, so the feed stays
//! newest-first however many pages are appended.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Aspect, CategoryId, ContentItem, ContentProvider, Cursor, MediaKind, Metrics, Page};
use crate::error::ProviderError;

const DISCOVER_CATEGORIES: &[&str] = &[
    "All",
    "City Nights",
    "Landscapes",
    "Portraits",
    "Street",
    "Food",
    "Architecture",
    "Travel",
    "Still Life",
];

const VIDEO_URL: &str = "https://www.w3schools.com/html/mov_bbb.mp4";

/// Span of creation times covered by one page.
const PAGE_WINDOW_MS: i64 = 12 * 60 * 60 * 1000;

/// Which screen's content a provider produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    /// Everything, spread over the photography categories.
    Discover,
    /// Curated items only; uncategorized and always featured.
    EditorPicks,
}

impl Catalog {
    pub fn title(self) -> &'static str {
        match self {
            Catalog::Discover => "Discover",
            Catalog::EditorPicks => "Editor Picks",
        }
    }

    /// Path segment used by remote backends.
    pub fn slug(self) -> &'static str {
        match self {
            Catalog::Discover => "discover",
            Catalog::EditorPicks => "editor-picks",
        }
    }

    /// Category names indexed by [`CategoryId`]; index 0 is "All".
    /// Empty when the screen offers no category bar.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            Catalog::Discover => DISCOVER_CATEGORIES,
            Catalog::EditorPicks => &[],
        }
    }

    pub fn category_name(self, id: CategoryId) -> &'static str {
        self.categories().get(id.0 as usize).copied().unwrap_or("Uncategorized")
    }
}

/// A provider that fabricates pages in memory.
pub struct MockProvider {
    catalog: Catalog,
    page_size: usize,
    latency: Duration,
    failure_rate: f64,
    epoch: DateTime<Utc>,
    rng: Mutex<StdRng>,
}

impl MockProvider {
    /// Create a provider with random seeding, no failures, and the
    /// default page size of 12 served after 500 ms.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            page_size: 12,
            latency: Duration::from_millis(500),
            failure_rate: 0.0,
            epoch: Utc::now(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Probability in `[0, 1]` that a fetch fails as if the backend were down.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Generate one page synchronously.  Exposed for tests so that they can
    /// inspect generation without waiting on the simulated latency.
    pub fn generate(&self, cursor: Cursor) -> Result<Page, ProviderError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ProviderError::Unavailable("generator poisoned".into()))?;

        if self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate) {
            return Err(ProviderError::Unavailable(format!(
                "{} backend did not answer",
                self.catalog.slug()
            )));
        }

        let window_start = self
            .epoch
            .checked_sub_signed(chrono::Duration::milliseconds(
                PAGE_WINDOW_MS.saturating_mul(cursor.0 as i64),
            ))
            .ok_or_else(|| ProviderError::Malformed(format!("cursor {cursor} is out of range")))?;
        let first_id = cursor.0 as u64 * self.page_size as u64 + 1;
        let mut items: Vec<ContentItem> = (0..self.page_size as u64)
            .map(|offset| {
                let id = first_id + offset;
                let kind = if rng.gen_bool(0.3) {
                    MediaKind::Video
                } else {
                    MediaKind::Image
                };
                let media_url = match kind {
                    MediaKind::Video => VIDEO_URL.to_string(),
                    MediaKind::Image => format!("https://picsum.photos/800/1200?random={id}"),
                };
                let aspect = if rng.gen_bool(0.4) {
                    Aspect::Portrait
                } else if rng.gen_bool(0.5) {
                    Aspect::Landscape
                } else {
                    Aspect::Square
                };
                let (category, featured, title) = match self.catalog {
                    Catalog::Discover => {
                        let category = CategoryId(rng.gen_range(1..=8));
                        let title = format!("{} {id}", self.catalog.category_name(category));
                        (category, rng.gen_bool(0.2), title)
                    }
                    Catalog::EditorPicks => (CategoryId::ALL, true, format!("Editor Pick {id}")),
                };
                // Photographers A..Z, cycling with the id.
                let author = format!("Photographer {}", (b'A' + (id % 26) as u8) as char);

                ContentItem {
                    id,
                    title,
                    author,
                    kind,
                    media_url,
                    aspect,
                    category,
                    metrics: Metrics {
                        likes: rng.gen_range(100..5100),
                        views: rng.gen_range(1000..51000),
                    },
                    created_at: window_start
                        - chrono::Duration::milliseconds(rng.gen_range(0..PAGE_WINDOW_MS)),
                    featured,
                }
            })
            .collect();

        items.sort(); // newest first

        Ok(Page {
            items,
            next_cursor: cursor.next(),
        })
    }
}

#[async_trait]
impl ContentProvider for MockProvider {
    fn name(&self) -> &str {
        self.catalog.title()
    }

    async fn fetch_page(&self, cursor: Cursor) -> Result<Page, ProviderError> {
        tokio::time::sleep(self.latency).await;
        self.generate(cursor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(catalog: Catalog) -> MockProvider {
        MockProvider::new(catalog).with_seed(7)
    }

    #[test]
    fn page_has_page_size_items_with_cursor_derived_ids() {
        let page = provider(Catalog::Discover)
            .with_page_size(12)
            .generate(Cursor(2))
            .unwrap();

        assert_eq!(page.items.len(), 12);
        assert_eq!(page.next_cursor, Cursor(3));

        let mut ids: Vec<u64> = page.items.iter().map(|i| i.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (25..=36).collect::<Vec<u64>>());
    }

    #[test]
    fn page_is_sorted_newest_first() {
        let page = provider(Catalog::Discover).generate(Cursor::FIRST).unwrap();
        assert!(page
            .items
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn consecutive_pages_keep_newest_first_order() {
        let provider = provider(Catalog::Discover);
        let feed: Vec<ContentItem> = (0..4)
            .flat_map(|n| provider.generate(Cursor(n)).unwrap().items)
            .collect();

        assert_eq!(feed.len(), 48);
        assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn retried_page_stays_in_its_window() {
        let provider = provider(Catalog::Discover);
        let first = provider.generate(Cursor(1)).unwrap();
        let again = provider.generate(Cursor(1)).unwrap();
        let newer = provider.generate(Cursor::FIRST).unwrap();

        let oldest_of_newer = newer.items.last().unwrap().created_at;
        for item in first.items.iter().chain(&again.items) {
            assert!(item.created_at <= oldest_of_newer);
        }
    }

    #[test]
    fn discover_items_are_categorized() {
        let page = provider(Catalog::Discover)
            .with_page_size(50)
            .generate(Cursor::FIRST)
            .unwrap();
        assert!(page.items.iter().all(|i| (1..=8).contains(&i.category.0)));
        assert!(page.items.iter().all(|i| i.title.starts_with(Catalog::Discover.category_name(i.category))));
    }

    #[test]
    fn editor_picks_are_featured_and_uncategorized() {
        let page = provider(Catalog::EditorPicks).generate(Cursor::FIRST).unwrap();
        assert!(page.items.iter().all(|i| i.featured));
        assert!(page.items.iter().all(|i| i.category.is_all()));
    }

    #[test]
    fn metrics_stay_in_range() {
        let page = provider(Catalog::Discover)
            .with_page_size(100)
            .generate(Cursor::FIRST)
            .unwrap();
        for item in &page.items {
            assert!((100..5100).contains(&item.metrics.likes));
            assert!((1000..51000).contains(&item.metrics.views));
        }
    }

    #[test]
    fn failure_rate_one_always_fails() {
        let result = provider(Catalog::Discover)
            .with_failure_rate(1.0)
            .generate(Cursor::FIRST);
        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
    }

    #[test]
    fn zero_page_size_is_raised_to_one() {
        let page = provider(Catalog::Discover)
            .with_page_size(0)
            .generate(Cursor::FIRST)
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn catalog_labels() {
        assert_eq!(Catalog::Discover.category_name(CategoryId(3)), "Portraits");
        assert_eq!(Catalog::Discover.category_name(CategoryId(42)), "Uncategorized");
        assert!(Catalog::EditorPicks.categories().is_empty());
        assert_eq!(provider(Catalog::EditorPicks).name(), "Editor Picks");
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_waits_for_simulated_latency() {
        let provider = provider(Catalog::Discover).with_latency(Duration::from_millis(500));
        let started = tokio::time::Instant::now();

        let page = provider.fetch_page(Cursor::FIRST).await.unwrap();

        assert_eq!(page.items.len(), 12);
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
