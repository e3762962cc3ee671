//! Header strip renderer for duprev.
//!
//! Three lines inside a bordered block: the signed-in account, the aggregate
//! stats, and the scan strip. The scan strip is the only place scan progress
//! is rendered, driven entirely by the poller's last-known `ScanStatus`.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
};

use duprev_core::types::ScanState;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::format::{group_digits, human_bytes};
use crate::ui::layout::panel_block;

/// Renders the header strip: account, stats, and scan progress.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel_block("duprev", false, theme);

    let text = Text::from(vec![
        account_line(state, theme),
        stats_line(state, theme),
        scan_line(state, theme),
    ]);

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn account_line(state: &AppState, theme: &Theme) -> Line<'static> {
    let meta = Style::default().fg(theme.file_meta);
    match &state.user {
        Some(user) => Line::from(vec![
            Span::styled(user.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(" <{}>", user.email), meta),
            Span::styled(format!("   backend {}", state.backend_url), meta),
        ]),
        None => Line::from(Span::styled("not signed in", meta)),
    }
}

fn stats_line(state: &AppState, theme: &Theme) -> Line<'static> {
    let meta = Style::default().fg(theme.file_meta);
    let Some(stats) = &state.stats else {
        return Line::from(Span::styled("stats unavailable", meta));
    };
    let accent = Style::default()
        .fg(theme.size_accent)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled("files ", meta),
        Span::styled(group_digits(stats.total_files), accent),
        Span::styled("   duplicate groups ", meta),
        Span::styled(group_digits(stats.duplicate_groups), accent),
        Span::styled("   reclaimable ", meta),
        Span::styled(human_bytes(stats.total_reclaimable_size), accent),
    ])
}

/// One line summarizing the scan, colored by its state.
fn scan_line(state: &AppState, theme: &Theme) -> Line<'static> {
    let status = state.poller.status();
    let scanned = group_digits(status.files_scanned);
    let (text, fg) = match status.status {
        ScanState::Idle => (
            "scan idle, press s to scan for duplicates".to_owned(),
            theme.file_meta,
        ),
        ScanState::Scanning => {
            let text = match status.total_files {
                Some(total) if total > 0 => {
                    let pct = status.files_scanned * 100 / total;
                    format!("scanning {scanned} / {} files ({pct}%)", group_digits(total))
                }
                _ => format!("scanning, {scanned} files found"),
            };
            (text, theme.scan_running)
        }
        ScanState::Complete => (
            format!("scan complete: {scanned} files scanned, press s to re-scan"),
            theme.scan_complete,
        ),
        ScanState::Error => {
            let msg = status.message.as_deref().unwrap_or("unknown error");
            (format!("scan failed: {msg}, press s to retry"), theme.scan_error)
        }
    };
    Line::from(Span::styled(text, Style::default().fg(fg)))
}
