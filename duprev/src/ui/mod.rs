//! UI rendering module for duprev.
//!
//! This is the module root for `ui/`. It re-exports `render()` as the single
//! entry point called by the event loop's `terminal.draw()` closure.
//!
//! All layout arithmetic lives in `layout.rs`. The dashboard panels live in
//! `header.rs`, `groups.rs`, and `files.rs`; the login screen in `login.rs`;
//! the modal dialogs in `confirm.rs` and `help.rs`.

mod layout;
pub mod confirm;
pub mod files;
pub mod format;
pub mod groups;
pub mod header;
pub mod help;
pub mod keybindings;
pub mod login;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
};

use crate::app::{AppState, Mode, Screen};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()`. This
/// is the only location where `terminal.draw()` is called in the application
/// — never call it from anywhere else.
///
/// After computing the layout, viewport heights and panel rects are written
/// back into `state` so that scroll operations and mouse hit-testing
/// triggered by the *next* input event can use them. The one-frame lag is
/// imperceptible in practice.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    frame.render_widget(
        Block::new().style(Style::default().bg(theme.background)),
        frame.area(),
    );

    if state.screen == Screen::Login {
        let [main_area, status_bar] = frame
            .area()
            .layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));
        login::render_login(frame, main_area, state, theme);
        render_status_bar(frame, status_bar, state, theme);
        return;
    }

    let [header_area, groups_area, files_area, status_bar] = compute_layout(frame, state);

    // Cache viewport heights and panel rects BEFORE rendering panels so they
    // are available for the next input cycle.
    state.groups_viewport_height = inner_rect(groups_area).height;
    state.files_viewport_height = inner_rect(files_area).height;
    state.panel_rects = [groups_area, files_area];

    let focus = state.focus;

    header::render_header(frame, header_area, state, theme);

    // Panels are skipped while collapsed on a narrow terminal.
    if groups_area.width > 0 {
        groups::render_groups(frame, groups_area, focus, state, theme);
    }
    if files_area.width > 0 {
        files::render_files(frame, files_area, focus, state, theme);
    }

    // Status bar: always visible, 1 row.
    render_status_bar(frame, status_bar, state, theme);

    // Modals are rendered after all panels so they sit on top. Clear is
    // called inside each renderer to erase the background.
    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmDelete => confirm::render_confirm_delete(frame, state, theme),
        Mode::ConfirmQuit => confirm::render_confirm_quit(frame, theme),
        Mode::Normal | Mode::FilterInput => {}
    }
}
