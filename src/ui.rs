//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering is read-only apart from
//! the list scroll state and the recorded [`Viewport`], which the main loop
//! hands to the feed after each frame.
//!
//! ## For contributors
//!
//! * The layout is a vertical split: screen tabs, the category bar (only on
//!   screens that have categories), the scrollable list, and a one-line
//!   status bar.
//! * The last list row is the sentinel.  Its visibility drives loading, so
//!   keep it as the final [`ListItem`].
//! * The preview is drawn last, on top of everything else.

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::feed::{FeedController, FeedStatus, Viewport};
use crate::provider::{ContentItem, MediaKind};

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop.  Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let has_categories = app
        .screen()
        .map(|s| !s.controller.catalog().categories().is_empty())
        .unwrap_or(false);

    let area = frame.area();
    let [tabs_area, categories_area, list_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(u16::from(has_categories)),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_tabs(app, frame, tabs_area);
    if has_categories {
        draw_category_bar(app, frame, categories_area);
    }
    app.viewport = draw_feed_list(app, frame, list_area);
    draw_status_bar(app, frame, status_area);
    draw_preview(app, frame, area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let tabs = Tabs::new(app.titles())
        .select(app.active_index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");
    frame.render_widget(tabs, area);
}

fn draw_category_bar(app: &App, frame: &mut Frame, area: Rect) {
    let Some(screen) = app.screen() else {
        return;
    };
    let selected = screen.controller.selected_category().0 as usize;

    let spans: Vec<Span> = screen
        .controller
        .catalog()
        .categories()
        .iter()
        .enumerate()
        .flat_map(|(i, name)| {
            let style = if i == selected {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {i}:{name} "), style), Span::raw(" ")]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn item_line(item: &ContentItem) -> Line<'_> {
    let mut spans = vec![
        Span::styled(
            format!("{:<17}", item.created_at.format("%Y-%m-%d %H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" "),
    ];
    if item.featured {
        spans.push(Span::styled(
            "★ ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    spans.extend([
        Span::styled(&item.title, Style::default().fg(Color::White)),
        Span::styled(format!("  by {}", item.author), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("  ♥ {}  ◉ {}", item.metrics.likes, item.metrics.views),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!(
                "  [{} {}]",
                match item.kind {
                    MediaKind::Image => "image",
                    MediaKind::Video => "video ▶",
                },
                item.aspect.label()
            ),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    Line::from(spans)
}

fn sentinel_line(controller: &FeedController) -> Line<'static> {
    match controller.status() {
        FeedStatus::Loading => Line::styled("  Loading…", Style::default().fg(Color::Yellow)),
        FeedStatus::Failed => Line::styled(
            "  Could not load more. Press r to retry.",
            Style::default().fg(Color::Red),
        ),
        FeedStatus::Idle | FeedStatus::Loaded => {
            Line::styled("  m: load more", Style::default().fg(Color::DarkGray))
        }
    }
}

/// Render the scrollable item list and return the viewport it ended up at.
fn draw_feed_list(app: &mut App, frame: &mut Frame, area: Rect) -> Option<Viewport> {
    let screen = app.screen_mut()?;
    let controller = &screen.controller;

    let mut list_items: Vec<ListItem> = controller
        .visible_items()
        .into_iter()
        .map(|item| ListItem::new(item_line(item)))
        .collect();
    list_items.push(ListItem::new(sentinel_line(controller)));

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(format!(" {} ", controller.catalog().title()))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut screen.list_state);

    Some(Viewport {
        offset: screen.list_state.offset(),
        height: area.height.saturating_sub(2) as usize,
    })
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let (visible, total, state) = match app.screen() {
        Some(screen) => {
            let c = &screen.controller;
            let state = if c.is_loading() {
                Span::styled("loading", Style::default().fg(Color::Yellow))
            } else if c.has_failed() {
                Span::styled("failed", Style::default().fg(Color::Red))
            } else {
                Span::raw("")
            };
            (c.visible_items().len(), c.items().len(), state)
        }
        None => (0, 0, Span::raw("")),
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{visible}/{total} items"),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        state,
        Span::raw("  q: quit  Tab: screen  ←/→: category  Enter: preview  m: more  r: retry"),
    ]));
    frame.render_widget(status, area);
}

/// Centre a rectangle of `percent_x` × `percent_y` of `area`, shrunk by `scale`.
fn popup_area(area: Rect, percent_x: f32, percent_y: f32, scale: f32) -> Rect {
    let width = ((area.width as f32 * percent_x * scale).round() as u16).min(area.width);
    let height = ((area.height as f32 * percent_y * scale).round() as u16).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Render the preview overlay, if open, over a dimmed backdrop.
fn draw_preview(app: &App, frame: &mut Frame, area: Rect) {
    let Some(screen) = app.screen() else {
        return;
    };
    let controller = &screen.controller;
    let Some(item) = controller.previewed_item() else {
        return;
    };

    // Grows from 90% to full size while entering.
    let scale = 0.9 + 0.1 * controller.preview().enter_progress(Instant::now());
    let popup = popup_area(area, 0.8, 0.7, scale);

    frame.render_widget(
        Block::default().style(Style::default().add_modifier(Modifier::DIM)),
        area,
    );
    frame.render_widget(Clear, popup);

    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::styled(
            item.title.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Line::styled(format!("by {}", item.author), Style::default().fg(Color::Gray)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Media     ", label),
            Span::raw(match item.kind {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
            }),
        ]),
        Line::from(vec![Span::styled("URL       ", label), Span::raw(item.media_url.as_str())]),
        Line::from(vec![Span::styled("Aspect    ", label), Span::raw(item.aspect.label())]),
        Line::from(vec![
            Span::styled("Category  ", label),
            Span::raw(controller.catalog().category_name(item.category)),
        ]),
        Line::from(vec![
            Span::styled("Likes     ", label),
            Span::raw(item.metrics.likes.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Views     ", label),
            Span::raw(item.metrics.views.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Posted    ", label),
            Span::raw(item.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]),
    ];
    if item.featured {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "★ Editor pick",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let preview = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Preview ")
                .title_bottom(" Esc: close ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        );
    frame.render_widget(preview, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{settle, test_app};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();

        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    // -- rendering (smoke tests) ---------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn draw_while_loading_shows_sentinel_and_tabs() {
        let mut app = test_app();
        let text = render(&mut app);

        assert!(text.contains("Discover"));
        assert!(text.contains("Editor Picks"));
        assert!(text.contains("Loading…"));
        assert!(text.contains("0/0 items"));
    }

    #[tokio::test(start_paused = true)]
    async fn draw_records_viewport() {
        let mut app = test_app();
        settle(&mut app).await;
        render(&mut app);

        // 30 rows minus tabs, categories, status and the list border.
        assert_eq!(app.viewport, Some(Viewport { offset: 0, height: 25 }));
    }

    #[tokio::test(start_paused = true)]
    async fn draw_status_shows_item_count_and_categories() {
        let mut app = test_app();
        settle(&mut app).await;
        let text = render(&mut app);

        assert!(text.contains("12/12 items"), "status bar should show item count");
        assert!(text.contains("0:All"));
        assert!(text.contains("m: load more"));
    }

    #[tokio::test(start_paused = true)]
    async fn editor_picks_has_no_category_bar() {
        let mut app = test_app();
        app.next_screen();
        settle(&mut app).await;
        let text = render(&mut app);

        assert!(!text.contains("0:All"));
        assert!(text.contains("★"));
    }

    #[tokio::test(start_paused = true)]
    async fn draw_preview_overlay() {
        let mut app = test_app();
        settle(&mut app).await;
        app.select_next();
        app.open_selected_preview();

        let text = render(&mut app);
        assert!(text.contains("Preview"));
        assert!(text.contains("Esc: close"));
    }

    #[test]
    fn popup_is_centred_and_scaled() {
        let area = Rect::new(0, 0, 100, 50);
        let full = popup_area(area, 0.8, 0.7, 1.0);
        assert_eq!(full, Rect::new(10, 7, 80, 35));

        let entering = popup_area(area, 0.8, 0.7, 0.9);
        assert_eq!(entering.width, 72);
        assert!(entering.x > full.x);
    }
}
