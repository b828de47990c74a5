//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in the status bar (`ui.rs`).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::provider::CategoryId;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc => {
            if !app.close_preview() {
                app.quit = true;
            }
        }
        KeyCode::Tab => app.next_screen(),
        KeyCode::BackTab => app.previous_screen(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_category(false),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_category(true),
        KeyCode::Char(c @ '0'..='8') => app.select_category(CategoryId(c as u8 - b'0')),
        KeyCode::Enter => app.open_selected_preview(),
        KeyCode::Char('m') => app.load_more(),
        KeyCode::Char('r') => app.retry(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{settle, test_app};
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test(start_paused = true)]
    async fn q_quits() {
        let mut app = test_app();
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.quit);
    }

    #[tokio::test(start_paused = true)]
    async fn release_events_are_ignored() {
        let mut app = test_app();
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key_event(&mut app, release);
        assert!(!app.quit);
    }

    #[tokio::test(start_paused = true)]
    async fn esc_closes_preview_before_quitting() {
        let mut app = test_app();
        settle(&mut app).await;
        handle_key_event(&mut app, press(KeyCode::Down));
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert!(app.screen().unwrap().controller.preview().is_open());

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(!app.screen().unwrap().controller.preview().is_open());
        assert!(!app.quit);

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.quit);
    }

    #[tokio::test(start_paused = true)]
    async fn digits_select_categories() {
        let mut app = test_app();
        handle_key_event(&mut app, press(KeyCode::Char('5')));
        assert_eq!(app.screen().unwrap().controller.selected_category(), CategoryId(5));

        handle_key_event(&mut app, press(KeyCode::Char('0')));
        assert_eq!(app.screen().unwrap().controller.selected_category(), CategoryId::ALL);
    }

    #[tokio::test(start_paused = true)]
    async fn tab_switches_screens() {
        let mut app = test_app();
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_index(), 1);
        handle_key_event(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn m_requests_another_page() {
        let mut app = test_app();
        settle(&mut app).await;
        handle_key_event(&mut app, press(KeyCode::Char('m')));
        assert!(app.screen().unwrap().controller.is_loading());
    }
}
