//! Responsive dashboard layout for duprev.
//!
//! This module is pure layout arithmetic — no mutable application state lives
//! here. It is called inside `terminal.draw()` on every render so every frame
//! gets a fresh layout that automatically reflects the current terminal size.
//!
//! # Panel geometry
//!
//! A fixed-height header strip sits above the two review panels, with a 1-row
//! status bar at the bottom. At `>= 100` columns both panels are visible
//! (groups 42%, files 58%). Below 100 columns only the focused panel is shown
//! at full width — Tab still moves focus, so both stay reachable.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single column and merge their junction
//! box-drawing characters automatically.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode, PanelFocus, Screen, StatusKind};
use crate::theme::Theme;
use crate::ui::format::human_bytes;

/// Height of the header strip, borders included.
pub const HEADER_HEIGHT: u16 = 5;

/// Returns `[header, groups, files, status_bar]` `Rect`s for the current frame.
///
/// Called inside `terminal.draw()` on every render. The returned rects are
/// valid only for the current draw closure — never store them across frames
/// (the cached copies in `AppState.panel_rects` are refreshed every render).
///
/// # Responsive behaviour
///
/// | Terminal width | Layout |
/// |----------------|--------|
/// | `< 100` cols   | Only the focused panel, full width |
/// | `>= 100` cols  | Groups 42% and files 58%, side by side |
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 4] {
    let term_width = frame.area().width;

    // Vertical split: header strip, review panels, 1-row status bar.
    let [header, main_area, status_bar] = frame.area().layout(&Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    // Horizontal split: collapse the unfocused panel when the terminal is narrow.
    let horizontal = if term_width >= 100 {
        Layout::horizontal([Constraint::Percentage(42), Constraint::Percentage(58)])
            .spacing(Spacing::Overlap(1))
    } else {
        let constraints = match state.focus {
            PanelFocus::Groups => [Constraint::Fill(1), Constraint::Length(0)],
            PanelFocus::Files => [Constraint::Length(0), Constraint::Fill(1)],
        };
        Layout::horizontal(constraints).spacing(Spacing::Overlap(1))
    };

    let [groups, files] = main_area.layout(&horizontal);

    [header, groups, files, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on
/// each side.
///
/// Used to cache viewport heights in `AppState` before panels are rendered,
/// so that half-page scroll distances are available at keypress time.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Applies `BorderType::Thick` when the panel is focused and
/// `BorderType::Plain` otherwise. Uses `MergeStrategy::Fuzzy` because `Exact`
/// produces incorrect junctions when mixing `Thick` and `Plain` borders.
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Always shows a mode indicator. While typing a filter the edit buffer is
/// echoed next to it; otherwise the transient status message is shown, and
/// failing that a summary of the current selection. A context-sensitive key
/// hint sits right-aligned at the end of the row.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::FilterInput => (" INPUT ", theme.status_mode_input),
        _ => (" NORMAL ", theme.status_mode_normal),
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];

    if state.mode == Mode::FilterInput {
        spans.push(Span::raw(format!(" folder filter: {}\u{2588}", state.filter_input)));
    } else if let Some(status) = &state.status_line {
        let fg = match status.kind {
            StatusKind::Info => theme.status_bar_fg,
            StatusKind::Success => theme.status_success,
            StatusKind::Error => theme.status_error,
        };
        spans.push(Span::styled(format!(" {}", status.text), Style::default().fg(fg)));
    } else if state.screen == Screen::Dashboard && state.session.marked_total() > 0 {
        spans.push(Span::raw(format!(
            " {} marked for deletion, {}",
            state.session.marked_total(),
            human_bytes(state.session.marked_bytes()),
        )));
    }

    let hint = hint_for(state);
    let [left, right] = area.layout(&Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(hint.chars().count() as u16 + 1),
    ]));

    let bar_style = Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), left);
    frame.render_widget(
        Paragraph::new(Line::raw(hint))
            .alignment(Alignment::Right)
            .style(bar_style),
        right,
    );
}

/// Picks the key hint matching what the user can do right now.
fn hint_for(state: &AppState) -> &'static str {
    if state.screen == Screen::Login {
        return "r retry  q quit ";
    }
    match state.mode {
        Mode::Normal => "space mark  D delete  ? help ",
        Mode::FilterInput => "enter apply  esc cancel ",
        Mode::ConfirmDelete => "y delete  n cancel ",
        Mode::ConfirmQuit => "y quit  n stay ",
        Mode::HelpOverlay => "? or esc to dismiss ",
    }
}
