//! photoland-feed: browse photography feeds in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌────────────┐  fetch_page  ┌──────────────┐  draw()  ┌──────────┐
//! │ provider/  │ ◄─────────── │ feed/        │ ───────► │  ui.rs   │
//! │ (async)    │ ───────────► │ controller   │ ◄─────── │ (render) │
//! └────────────┘  (channel)   └──────────────┘ viewport └──────────┘
//!                                    ▲
//!                                    │ app.rs / handle_key_event()
//!                               ┌──────────┐
//!                               │ input.rs │
//!                               └──────────┘
//! ```
//!
//! * **`provider/`**: the `ContentProvider` trait, `ContentItem`, and the
//!   mock and HTTP backends.
//! * **`feed/`**: the feed store, category filter, viewport trigger,
//!   preview overlay, and the controller that wires them together.
//! * **`app`**: the Discover and Editor Picks screens and which is active.
//! * **`ui`**: rendering: reads `App` state and draws widgets.
//! * **`input`**: maps key events to `App` mutations.
//! * **`config`**: command-line flags and the optional settings file.
//! * **`main`**: wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod config;
mod error;
mod feed;
mod input;
mod provider;
mod ui;

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use app::App;
use config::{Args, Settings};
use feed::{FeedController, ScreenConfig};
use provider::{Catalog, ContentProvider, HttpProvider, MockProvider};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Send logs to a file; stdout belongs to the UI.  `RUST_LOG` overrides the
/// default `info` level.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// One controller per screen, each with its own provider.
fn build_controllers(settings: &Settings) -> Result<Vec<FeedController>> {
    [Catalog::Discover, Catalog::EditorPicks]
        .into_iter()
        .map(|catalog| -> Result<FeedController> {
            let provider: Arc<dyn ContentProvider> = match &settings.endpoint {
                Some(url) => Arc::new(
                    HttpProvider::new(url, catalog, settings.page_size, settings.request_timeout())
                        .with_context(|| format!("Failed to set up provider for {url}"))?,
                ),
                None => {
                    let mut mock = MockProvider::new(catalog)
                        .with_page_size(settings.page_size)
                        .with_latency(settings.latency())
                        .with_failure_rate(settings.failure_rate);
                    if let Some(seed) = settings.seed {
                        mock = mock.with_seed(seed);
                    }
                    Arc::new(mock)
                }
            };

            let config = ScreenConfig {
                prefetch_rows: settings.prefetch_rows,
                request_timeout: settings.request_timeout(),
                ..ScreenConfig::new(catalog)
            };
            Ok(FeedController::new(config, provider))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // -- parse arguments -----------------------------------------------------
    let args = Args::parse();
    let settings = Settings::resolve(&args).context("Invalid configuration")?;

    init_logging(&settings.log_file)?;
    tracing::info!(?settings, "starting");

    let controllers = build_controllers(&settings)?;

    install_panic_hook();

    // -- terminal setup (Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(controllers);

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply finished page loads.
    //   2. Render the UI, then let the feed react to the new viewport.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        app.tick();

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;
        app.observe_viewport();

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("shutting down");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
