//! Sign-in screen for duprev.
//!
//! Authentication happens in the browser: the backend hands out a provider
//! sign-in URL, the user completes the flow there, and `r` re-probes the
//! session. This screen's job is to show that URL and the state of the probe.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the centered sign-in card.
pub fn render_login(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let card = area.centered(Constraint::Max(70), Constraint::Max(18));
    let meta = Style::default().fg(theme.file_meta);

    let mut lines = vec![
        Line::from(""),
        Line::styled("duprev", Style::default().add_modifier(Modifier::BOLD)).centered(),
        Line::styled("duplicate file cleanup for your cloud drive", meta).centered(),
        Line::from(""),
        bullet("scans every file in your drive", theme),
        bullet("detects duplicates by content hash", theme),
        bullet("lets you review each copy before anything is deleted", theme),
        bullet("deleted files go to the recycle bin, fully recoverable", theme),
        Line::from(""),
    ];

    match &state.login_url {
        Some(url) => {
            lines.push(Line::from(vec![
                Span::styled("  sign in: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(url.clone(), Style::default().fg(theme.size_accent)),
            ]));
            lines.push(Line::styled(
                "  open the link in a browser, then press r",
                meta,
            ));
        }
        None => lines.push(Line::styled("  fetching sign-in link...", meta)),
    }
    if let Some(err) = &state.login_error {
        lines.push(Line::styled(
            format!("  {}", err),
            Style::default().fg(theme.status_error),
        ));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(format!("  backend {}", state.backend_url), meta));

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(panel_block("Sign in", true, theme))
            .wrap(Wrap { trim: false }),
        card,
    );
}

fn bullet(text: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("  * ", Style::default().fg(theme.mark_keep)),
        Span::raw(text),
    ])
}
