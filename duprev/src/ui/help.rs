//! Help overlay renderer for duprev.
//!
//! Provides `render_help_overlay()` which draws a centred modal box over the
//! dashboard using ratatui's `Clear` widget to erase the background first.
//! The overlay is rendered inside the same `terminal.draw()` closure as all
//! other panels — calling `frame.render_widget(Clear, area)` before the
//! bordered `Paragraph` achieves the modal effect without a second draw call.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal on top of the dashboard.
///
/// The paragraph scrolls vertically by `help_scroll` rows, enabling
/// navigation of the full keybinding list on short terminals. Skipped when
/// the terminal is narrower than 60 columns to avoid a zero-height `Rect`.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    // Erase the background behind the modal before drawing content.
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  — j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

/// Builds the help text as a multi-line `Text` value, grouped by section.
fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Navigation"),
        Line::from("  j / k         Move down / up one row"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from("  Tab           Switch between the group and file panels"),
        Line::from("  H / L         Move panel focus left / right"),
        Line::from("  Enter         Focus the file list of the selected group"),
        Line::from(""),
        Line::from("Selection"),
        Line::from("  Space         Toggle keep/delete on the file under the cursor"),
        Line::from("                (toggles the whole group from the group panel)"),
        Line::from("  a             Mark / unmark every duplicate in the selected group"),
        Line::from("  A             Mark every duplicate everywhere (again to undo)"),
        Line::from("  c             Clear all marks, keeping every file"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  s             Start a scan (or re-scan after one finished)"),
        Line::from("  r             Reload the duplicate listing and stats"),
        Line::from("  / or f        Filter groups by folder path"),
        Line::from("  D             Delete the marked files (asks first)"),
        Line::from("  x             Sign out"),
        Line::from(""),
        Line::from("General"),
        Line::from("  j / k         Scroll this help overlay"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit (confirms while a delete is running)"),
    ])
}
