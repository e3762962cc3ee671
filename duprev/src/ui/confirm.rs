//! Confirmation modals for duprev.
//!
//! Both dialogs follow the help overlay's pattern: erase the area with
//! `Clear`, then draw a bordered `Paragraph` inside the same
//! `terminal.draw()` closure. Key handling lives in `keybindings.rs`; these
//! functions only render.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::format::{human_bytes, truncate_front};

/// How many marked files the delete dialog lists before collapsing the rest
/// into a `+N more` row.
const PREVIEW_ROWS: usize = 8;

/// Renders the delete confirmation dialog over the dashboard.
///
/// Shows the headline count and byte total, a preview of the first few
/// marked files, and the recycle-bin note. Skipped on very narrow terminals;
/// the status bar still shows the y/n hint, so the mode stays operable.
pub fn render_confirm_delete(frame: &mut Frame, state: &AppState, theme: &Theme) {
    if frame.area().width < 50 {
        return;
    }

    let marked = state.session.marked();
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "Delete {} file(s), {}?",
                marked.len(),
                human_bytes(state.session.marked_bytes()),
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let meta = Style::default().fg(theme.file_meta);
    for file in marked.iter().take(PREVIEW_ROWS) {
        lines.push(Line::from(vec![
            Span::raw(format!("  {}", file.name)),
            Span::styled(format!("  {}", truncate_front(&file.path, 34)), meta),
        ]));
    }
    if marked.len() > PREVIEW_ROWS {
        lines.push(Line::styled(
            format!("  +{} more", marked.len() - PREVIEW_ROWS),
            meta,
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::styled(
        "Deleted files go to the provider's recycle bin and can be restored.",
        meta,
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("y", Style::default().fg(theme.mark_delete).add_modifier(Modifier::BOLD)),
        Span::raw(" to delete, "),
        Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to cancel"),
    ]));

    let height = lines.len() as u16 + 2;
    let area = frame
        .area()
        .centered(Constraint::Max(70), Constraint::Length(height));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(
                Block::bordered()
                    .title("Confirm deletion")
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(theme.status_error)),
            )
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// Renders the quit confirmation shown while a delete is still in flight.
pub fn render_confirm_quit(frame: &mut Frame, theme: &Theme) {
    if frame.area().width < 50 {
        return;
    }

    let lines = vec![
        Line::from("A delete request is still running."),
        Line::from(""),
        Line::from("Quit anyway? Its result will not be shown."),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to quit, "),
            Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to stay"),
        ]),
    ];

    let area = frame
        .area()
        .centered(Constraint::Max(56), Constraint::Length(lines.len() as u16 + 2));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::bordered()
                .title("Confirm quit")
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(theme.border_active)),
        ),
        area,
    );
}
