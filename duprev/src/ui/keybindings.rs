//! Keybinding dispatcher for duprev.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns
//! a `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches on the active screen first, then on `state.mode`, so
//! the login screen, the confirmation dialogs, the filter input, and Normal
//! mode all have isolated handler functions.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::api::types::ApiRequest;
use crate::app::{AppState, Mode, PanelFocus, Screen};

/// Control-flow signal returned from the key dispatcher.
///
/// The event loop checks this after every keypress: `Quit` tears down the
/// terminal and exits; `Continue` leaves the loop running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current screen and mode.
///
/// Mutates `state` in place and returns a `KeyAction` signalling whether to
/// continue or quit. `now` feeds the state methods that schedule polls or
/// stamp status messages.
pub fn handle_key(key: KeyEvent, state: &mut AppState, now: Instant) -> KeyAction {
    // Ctrl-c always quits, even while a delete is in flight.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    if state.screen == Screen::Login {
        return handle_login(key, state);
    }

    match state.mode {
        Mode::Normal => handle_normal(key, state, now),
        Mode::FilterInput => handle_filter_input(key, state),
        Mode::ConfirmDelete => handle_confirm_delete(key, state, now),
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
    }
}

// ---------------------------------------------------------------------------
// Login screen
// ---------------------------------------------------------------------------

/// Handles a key event on the login screen.
///
/// `r` re-probes the session after the user finished the browser flow, `l`
/// fetches a fresh sign-in link, and `q` / `Esc` quits.
fn handle_login(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('r') => {
            state.retry_sign_in();
            KeyAction::Continue
        }
        KeyCode::Char('l') => {
            state.login_url = None;
            state.request(ApiRequest::LoginUrl);
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event while in Normal mode on the dashboard.
///
/// Delegates scroll keys to `handle_scroll_key` and handles focus movement,
/// selection edits, and mode transitions inline.
fn handle_normal(key: KeyEvent, state: &mut AppState, now: Instant) -> KeyAction {
    // Try scroll keys first (j/k/g/G/Ctrl-d/u).
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        // Panel focus
        KeyCode::Tab => {
            state.focus = state.focus.next();
            KeyAction::Continue
        }
        KeyCode::Char('H') => {
            state.focus = state.focus.prev();
            KeyAction::Continue
        }
        KeyCode::Char('L') => {
            state.focus = state.focus.next();
            KeyAction::Continue
        }
        // Enter drills from the group list into its files.
        KeyCode::Enter => {
            if state.focus == PanelFocus::Groups {
                state.focus = PanelFocus::Files;
            }
            KeyAction::Continue
        }

        // Selection edits
        KeyCode::Char(' ') => {
            match state.focus {
                PanelFocus::Groups => state.toggle_current_group(),
                PanelFocus::Files => state.toggle_current_file(now),
            }
            KeyAction::Continue
        }
        KeyCode::Char('a') => {
            state.toggle_current_group();
            KeyAction::Continue
        }
        KeyCode::Char('A') => {
            state.select_all();
            KeyAction::Continue
        }
        KeyCode::Char('c') => {
            state.clear_marks();
            KeyAction::Continue
        }

        // Backend actions
        KeyCode::Char('s') => {
            state.start_scan(now);
            KeyAction::Continue
        }
        KeyCode::Char('r') => {
            state.refresh();
            KeyAction::Continue
        }
        KeyCode::Char('/') | KeyCode::Char('f') => {
            state.begin_filter_input();
            KeyAction::Continue
        }
        KeyCode::Char('D') => {
            state.open_delete_confirm(now);
            KeyAction::Continue
        }
        KeyCode::Char('x') => {
            state.logout();
            KeyAction::Continue
        }

        // Help overlay
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }

        // Quit / confirm-quit
        KeyCode::Char('q') | KeyCode::Esc => {
            if state.quit_needs_confirm() {
                state.mode = Mode::ConfirmQuit;
                KeyAction::Continue
            } else {
                KeyAction::Quit
            }
        }

        _ => KeyAction::Continue,
    }
}

/// Handles scroll-related keys in Normal mode: j / k / g / G and Ctrl combos.
///
/// Returns `Some(KeyAction)` when the key was consumed, `None` when the key
/// should fall through to the rest of the Normal handler.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.scroll_down(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.scroll_up(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('g') => {
            state.scroll_top();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('G') => {
            state.scroll_bottom();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('d') if ctrl => {
            state.half_page_down();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('u') if ctrl => {
            state.half_page_up();
            Some(KeyAction::Continue)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// FilterInput mode
// ---------------------------------------------------------------------------

/// Handles a key event while typing a folder filter.
///
/// Enter applies (an empty buffer clears the filter), Esc cancels without
/// touching the applied filter, and everything printable lands in the buffer.
fn handle_filter_input(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Enter => state.apply_filter(),
        KeyCode::Esc => state.cancel_filter_input(),
        KeyCode::Backspace => {
            state.filter_input.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.filter_input.push(c);
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// ConfirmDelete mode
// ---------------------------------------------------------------------------

/// Handles a key event while the delete-confirmation dialog is active.
///
/// `y` / `Y` sends the delete. `n` / `N` / `Esc` / `q` cancels, leaving the
/// selection intact.
fn handle_confirm_delete(key: KeyEvent, state: &mut AppState, now: Instant) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            state.confirm_delete(now);
            KeyAction::Continue
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is visible.
///
/// Any of `?`, `Esc`, or `q` dismisses the overlay and returns to Normal
/// mode. All other keys are silently ignored.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => {
            state.help_scroll = state.help_scroll.saturating_add(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
            KeyAction::Continue
        }
        KeyCode::Char('g') => {
            state.help_scroll = 0;
            KeyAction::Continue
        }
        KeyCode::Char('G') => {
            state.help_scroll = u16::MAX;
            KeyAction::Continue
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// ConfirmQuit mode
// ---------------------------------------------------------------------------

/// Handles a key event while the quit-confirmation dialog is active.
///
/// `y` / `Y` confirms the quit and returns `Quit`. `n` / `N` / `Esc` cancels
/// and returns to Normal mode. All other keys are ignored.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: click-to-focus and scroll-wheel.
///
/// Left click on a panel sets focus to that panel. Scroll wheel up/down
/// scrolls the focused panel by 3 lines (matching typical terminal scroll
/// speed). Mouse events in HelpOverlay mode scroll the help overlay.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    if state.screen == Screen::Login {
        return KeyAction::Continue;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            handle_mouse_click(mouse.column, mouse.row, state)
        }
        MouseEventKind::ScrollUp => handle_mouse_scroll_up(state),
        MouseEventKind::ScrollDown => handle_mouse_scroll_down(state),
        _ => KeyAction::Continue,
    }
}

/// Sets panel focus based on the clicked screen position.
///
/// Checks each cached panel rect in `state.panel_rects`. Panels with zero
/// width are skipped so collapsed panels cannot receive focus via click.
fn handle_mouse_click(col: u16, row: u16, state: &mut AppState) -> KeyAction {
    let pos = Position { x: col, y: row };
    let [groups, files] = state.panel_rects;

    if groups.width > 0 && groups.contains(pos) {
        state.focus = PanelFocus::Groups;
    } else if files.width > 0 && files.contains(pos) {
        state.focus = PanelFocus::Files;
    }

    KeyAction::Continue
}

/// Scrolls up by 3 lines. Scrolls the help overlay when in HelpOverlay mode.
fn handle_mouse_scroll_up(state: &mut AppState) -> KeyAction {
    if state.mode == Mode::HelpOverlay {
        state.help_scroll = state.help_scroll.saturating_sub(3);
    } else {
        state.scroll_up(3);
    }
    KeyAction::Continue
}

/// Scrolls down by 3 lines. Scrolls the help overlay when in HelpOverlay mode.
fn handle_mouse_scroll_down(state: &mut AppState) -> KeyAction {
    if state.mode == Mode::HelpOverlay {
        state.help_scroll = state.help_scroll.saturating_add(3);
    } else {
        state.scroll_down(3);
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use duprev_core::poller::DEFAULT_POLL_INTERVAL;

    fn dashboard_state() -> AppState {
        let mut state = AppState::new(DEFAULT_POLL_INTERVAL, "http://localhost:8000".into());
        state.screen = Screen::Dashboard;
        state
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn question_mark_opens_help_and_esc_dismisses_it() {
        let mut state = dashboard_state();
        assert_eq!(handle_key(press(KeyCode::Char('?')), &mut state, Instant::now()), KeyAction::Continue);
        assert_eq!(state.mode, Mode::HelpOverlay);
        handle_key(press(KeyCode::Esc), &mut state, Instant::now());
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn quit_asks_first_only_while_a_delete_is_running() {
        let mut state = dashboard_state();
        assert_eq!(
            handle_key(press(KeyCode::Char('q')), &mut state, Instant::now()),
            KeyAction::Quit
        );

        state.delete_in_flight = true;
        assert_eq!(
            handle_key(press(KeyCode::Char('q')), &mut state, Instant::now()),
            KeyAction::Continue
        );
        assert_eq!(state.mode, Mode::ConfirmQuit);
        assert_eq!(
            handle_key(press(KeyCode::Char('n')), &mut state, Instant::now()),
            KeyAction::Continue
        );
        assert_eq!(state.mode, Mode::Normal);
        handle_key(press(KeyCode::Char('q')), &mut state, Instant::now());
        assert_eq!(
            handle_key(press(KeyCode::Char('y')), &mut state, Instant::now()),
            KeyAction::Quit
        );
    }

    #[test]
    fn typed_filter_applies_on_enter_and_reverts_on_esc() {
        let mut state = dashboard_state();
        handle_key(press(KeyCode::Char('/')), &mut state, Instant::now());
        assert_eq!(state.mode, Mode::FilterInput);
        for c in "/Pics".chars() {
            handle_key(press(KeyCode::Char(c)), &mut state, Instant::now());
        }
        handle_key(press(KeyCode::Enter), &mut state, Instant::now());
        assert_eq!(state.folder_filter.as_deref(), Some("/Pics"));
        assert_eq!(state.mode, Mode::Normal);

        handle_key(press(KeyCode::Char('f')), &mut state, Instant::now());
        handle_key(press(KeyCode::Char('x')), &mut state, Instant::now());
        handle_key(press(KeyCode::Esc), &mut state, Instant::now());
        assert_eq!(state.folder_filter.as_deref(), Some("/Pics"));
    }

    #[test]
    fn tab_flips_panel_focus() {
        let mut state = dashboard_state();
        assert_eq!(state.focus, PanelFocus::Groups);
        handle_key(press(KeyCode::Tab), &mut state, Instant::now());
        assert_eq!(state.focus, PanelFocus::Files);
        handle_key(press(KeyCode::Tab), &mut state, Instant::now());
        assert_eq!(state.focus, PanelFocus::Groups);
    }
}
