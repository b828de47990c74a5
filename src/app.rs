use ratatui::widgets::ListState;

use crate::feed::{FeedController, Viewport};
use crate::provider::{CategoryId, ItemId};

/// One feed screen: its controller plus the list cursor.
pub struct FeedScreen {
    pub controller: FeedController,
    /// Selection among the visible items, for scrolling.
    pub list_state: ListState,
}

impl FeedScreen {
    pub fn new(controller: FeedController) -> Self {
        Self {
            controller,
            list_state: ListState::default(),
        }
    }

    fn selected_item_id(&self) -> Option<ItemId> {
        let index = self.list_state.selected()?;
        self.controller.visible_items().get(index).map(|item| item.id)
    }
}

pub struct App {
    screens: Vec<FeedScreen>,
    active: usize,
    /// Viewport of the list in the last rendered frame.
    pub viewport: Option<Viewport>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last load status message.
    pub status: String,
}

impl App {
    /// Build the app and activate the first screen.  Must be called from
    /// within a tokio runtime, as activation starts loading.
    pub fn new(controllers: Vec<FeedController>) -> Self {
        let mut app = Self {
            screens: controllers.into_iter().map(FeedScreen::new).collect(),
            active: 0,
            viewport: None,
            quit: false,
            status: "Starting…".into(),
        };
        app.activate();
        app
    }

    fn activate(&mut self) {
        let Some(screen) = self.screens.get_mut(self.active) else {
            return;
        };
        screen.list_state = ListState::default();
        screen.controller.initialize();
        self.viewport = None;
        self.status = format!("Loading {}…", screen.controller.catalog().title());
    }

    pub fn screen(&self) -> Option<&FeedScreen> {
        self.screens.get(self.active)
    }

    pub fn screen_mut(&mut self) -> Option<&mut FeedScreen> {
        self.screens.get_mut(self.active)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn titles(&self) -> Vec<&'static str> {
        self.screens
            .iter()
            .map(|s| s.controller.catalog().title())
            .collect()
    }

    // -- screens -------------------------------------------------------------

    fn switch_to(&mut self, index: usize) {
        if index == self.active || index >= self.screens.len() {
            return;
        }
        if let Some(screen) = self.screen_mut() {
            screen.controller.teardown();
        }
        self.active = index;
        self.activate();
    }

    pub fn next_screen(&mut self) {
        if !self.screens.is_empty() {
            self.switch_to((self.active + 1) % self.screens.len());
        }
    }

    pub fn previous_screen(&mut self) {
        if !self.screens.is_empty() {
            self.switch_to((self.active + self.screens.len() - 1) % self.screens.len());
        }
    }

    // -- loading -------------------------------------------------------------

    /// Apply finished page loads and refresh the status line.
    pub fn tick(&mut self) {
        let Some(screen) = self.screens.get_mut(self.active) else {
            return;
        };
        if screen.controller.pump() == 0 {
            return;
        }
        self.status = match screen.controller.last_error() {
            Some(e) => format!("Error: {e}"),
            None => format!("Fetched {} items", screen.controller.items().len()),
        };
    }

    /// Hand the last frame's viewport to the active feed.
    pub fn observe_viewport(&mut self) {
        let Some(viewport) = self.viewport.take() else {
            return;
        };
        if let Some(screen) = self.screen_mut() {
            screen.controller.observe_viewport(viewport);
        }
    }

    pub fn load_more(&mut self) {
        if let Some(screen) = self.screen_mut() {
            screen.controller.request_next_page();
        }
    }

    pub fn retry(&mut self) {
        let Some(screen) = self.screens.get_mut(self.active) else {
            return;
        };
        if screen.controller.retry() {
            self.status = "Retrying…".into();
        }
    }

    // -- categories ----------------------------------------------------------

    pub fn select_category(&mut self, id: CategoryId) {
        let Some(screen) = self.screen_mut() else {
            return;
        };
        if screen.controller.select_category(id) {
            let first = (!screen.controller.visible_items().is_empty()).then_some(0);
            screen.list_state.select(first);
        }
    }

    /// Step through the screen's categories, wrapping around.
    pub fn cycle_category(&mut self, forward: bool) {
        let Some(screen) = self.screen() else {
            return;
        };
        let count = screen.controller.catalog().categories().len();
        if count == 0 {
            return;
        }
        let current = screen.controller.selected_category().0 as usize;
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.select_category(CategoryId(next as u8));
    }

    // -- preview -------------------------------------------------------------

    pub fn open_selected_preview(&mut self) {
        let Some(screen) = self.screen_mut() else {
            return;
        };
        if let Some(id) = screen.selected_item_id() {
            screen.controller.open_preview(id);
        }
    }

    /// Close the preview if one is open; returns whether it was.
    pub fn close_preview(&mut self) -> bool {
        let Some(screen) = self.screen_mut() else {
            return false;
        };
        let was_open = screen.controller.preview().is_open();
        screen.controller.close_preview();
        was_open
    }

    // -- navigation ----------------------------------------------------------

    fn visible_len(&self) -> usize {
        self.screen()
            .map(|s| s.controller.visible_items().len())
            .unwrap_or(0)
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        let Some(screen) = self.screen_mut() else {
            return;
        };
        if len == 0 {
            return;
        }
        let i = match screen.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        screen.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        let len = self.visible_len();
        let Some(screen) = self.screen_mut() else {
            return;
        };
        if len == 0 {
            return;
        }
        let i = match screen.list_state.selected() {
            Some(i) => i.saturating_sub(1).min(len - 1),
            None => 0,
        };
        screen.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        let len = self.visible_len();
        if let Some(screen) = self.screen_mut() {
            if len > 0 {
                screen.list_state.select(Some(0));
            }
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_len();
        if let Some(screen) = self.screen_mut() {
            if len > 0 {
                screen.list_state.select(Some(len - 1));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::feed::ScreenConfig;
    use crate::provider::{Catalog, ContentProvider, MockProvider};
    use std::sync::Arc;
    use std::time::Duration;

    pub(crate) fn controller(catalog: Catalog) -> FeedController {
        let provider: Arc<dyn ContentProvider> = Arc::new(
            MockProvider::new(catalog)
                .with_seed(11)
                .with_latency(Duration::from_millis(500)),
        );
        FeedController::new(ScreenConfig::new(catalog), provider)
    }

    pub(crate) fn test_app() -> App {
        App::new(vec![
            controller(Catalog::Discover),
            controller(Catalog::EditorPicks),
        ])
    }

    pub(crate) async fn settle(app: &mut App) {
        app.screen_mut().unwrap().controller.settle().await;
    }

    fn selected(app: &App) -> Option<usize> {
        app.screen().unwrap().list_state.selected()
    }

    // -- construction --------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn new_app_activates_first_screen() {
        let app = test_app();
        assert_eq!(app.active_index(), 0);
        assert_eq!(app.titles(), vec!["Discover", "Editor Picks"]);
        assert!(app.screen().unwrap().controller.is_loading());
        assert!(!app.quit);
        assert!(selected(&app).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn tick_applies_loaded_page_and_updates_status() {
        let mut app = test_app();
        tokio::time::sleep(Duration::from_millis(600)).await;

        app.tick();

        assert_eq!(app.screen().unwrap().controller.items().len(), 12);
        assert_eq!(app.status, "Fetched 12 items");
    }

    // -- screens -------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn switching_screens_resets_the_feed() {
        let mut app = test_app();
        settle(&mut app).await;
        app.select_next();

        app.next_screen();
        assert_eq!(app.active_index(), 1);
        assert!(app.screen().unwrap().controller.is_loading());
        assert!(selected(&app).is_none());

        app.previous_screen();
        assert_eq!(app.active_index(), 0);
        assert!(
            app.screen().unwrap().controller.items().is_empty(),
            "navigating back starts a fresh feed"
        );
    }

    // -- categories ----------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn cycle_category_wraps_and_resets_selection() {
        let mut app = test_app();
        settle(&mut app).await;
        app.select_last();

        app.cycle_category(false);
        let controller = &app.screen().unwrap().controller;
        assert_eq!(controller.selected_category(), CategoryId(8));
        let expected = (!controller.visible_items().is_empty()).then_some(0);
        assert_eq!(selected(&app), expected);

        app.cycle_category(true);
        assert_eq!(app.screen().unwrap().controller.selected_category(), CategoryId::ALL);
        assert_eq!(selected(&app), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn editor_picks_has_no_categories_to_cycle() {
        let mut app = test_app();
        app.next_screen();
        app.cycle_category(true);
        assert_eq!(app.screen().unwrap().controller.selected_category(), CategoryId::ALL);
    }

    // -- preview -------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn open_and_close_preview_for_selected_item() {
        let mut app = test_app();
        settle(&mut app).await;

        app.open_selected_preview();
        assert!(!app.screen().unwrap().controller.preview().is_open(), "nothing selected");

        app.select_next();
        app.open_selected_preview();
        let first_id = app.screen().unwrap().controller.visible_items()[0].id;
        assert_eq!(app.screen().unwrap().controller.preview().item_id(), Some(first_id));

        assert!(app.close_preview());
        assert!(!app.close_preview());
    }

    // -- navigation ----------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn navigation_on_empty_is_noop() {
        let mut app = test_app();
        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(selected(&app).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_clamps_to_visible_items() {
        let mut app = test_app();
        settle(&mut app).await;

        app.select_next();
        assert_eq!(selected(&app), Some(0));
        app.select_next();
        assert_eq!(selected(&app), Some(1));

        app.select_last();
        app.select_next();
        assert_eq!(selected(&app), Some(11));

        app.select_first();
        app.select_previous();
        assert_eq!(selected(&app), Some(0));
    }

    // -- loading -------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn load_more_and_retry_share_the_gate() {
        let mut app = test_app();
        settle(&mut app).await;

        app.load_more();
        app.load_more();
        app.retry();
        assert_ne!(app.status, "Retrying…", "retry is a no-op while loading");
        settle(&mut app).await;

        assert_eq!(app.screen().unwrap().controller.items().len(), 24);
    }

    #[tokio::test(start_paused = true)]
    async fn observe_viewport_consumes_the_recorded_viewport() {
        let mut app = test_app();
        settle(&mut app).await;

        app.viewport = Some(Viewport { offset: 0, height: 30 });
        app.observe_viewport();

        assert!(app.viewport.is_none());
        assert!(app.screen().unwrap().controller.is_loading());
    }
}
