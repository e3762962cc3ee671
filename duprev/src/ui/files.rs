//! File list panel for the selected duplicate group.
//!
//! Every row carries its keep/delete mark, so the consequence of the current
//! selection is visible file by file before anything is sent to the backend.
//! The suggested-keep copy is starred.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use duprev_core::types::{DuplicateGroup, FileRecord};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::format::{human_bytes, short_date, short_hash, truncate_front};
use crate::ui::layout::panel_block;

/// Renders the file panel for the group under the cursor.
///
/// The group's short hash is shown in the panel title. Uses
/// `render_stateful_widget` so the ListState selection highlight is applied.
pub fn render_files(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Files;
    let (title, items) = build_list(state, theme);

    let list = List::new(items)
        .block(panel_block(&title, is_focused, theme))
        .highlight_style(Style::default().fg(theme.border_active));

    frame.render_stateful_widget(list, area, &mut state.file_list_state);
}

fn build_list(state: &AppState, theme: &Theme) -> (String, Vec<ListItem<'static>>) {
    let Some(group) = state.current_group() else {
        let placeholder = ListItem::new(Line::styled(
            "No group selected",
            Style::default().fg(theme.file_meta),
        ));
        return ("Files".to_owned(), vec![placeholder]);
    };

    let title = format!("Files ({})  {}", group.files.len(), short_hash(&group.hash));
    let items = group
        .files
        .iter()
        .map(|f| file_item(f, group, state, theme))
        .collect();
    (title, items)
}

/// Converts one file into a styled ListItem.
///
/// Format: `[keep] * report.pdf  /Documents/report.pdf  1.5 MB  Jan 5, 2026`,
/// where `*` marks the backend's suggested keep. The mime type and a
/// `[preview]` marker for files with a thumbnail are appended when present.
fn file_item(
    file: &FileRecord,
    group: &DuplicateGroup,
    state: &AppState,
    theme: &Theme,
) -> ListItem<'static> {
    let mark = if state.session.is_kept(&group.hash, &file.id) {
        Span::styled("[keep] ", Style::default().fg(theme.mark_keep))
    } else {
        Span::styled(
            "[del]  ",
            Style::default()
                .fg(theme.mark_delete)
                .add_modifier(Modifier::BOLD),
        )
    };
    let suggested = if file.id == group.suggested_keep_id {
        Span::styled("* ", Style::default().fg(theme.badge_suggested))
    } else {
        Span::raw("  ")
    };
    let name = Span::raw(file.name.clone());
    let mut details = format!(
        "  {}  {}  {}",
        truncate_front(&file.path, 36),
        human_bytes(file.size),
        short_date(&file.last_modified),
    );
    if let Some(mime) = &file.mime_type {
        details.push_str(&format!("  {}", mime));
    }
    if file.thumbnail_url.is_some() {
        details.push_str("  [preview]");
    }
    let meta = Span::styled(details, Style::default().fg(theme.file_meta));
    ListItem::new(Line::from(vec![mark, suggested, name, meta]))
}
