//! Duplicate-group list panel for duprev.
//!
//! Renders the left panel from the review session's group listing. Each row
//! shows the copy count, the space a full cleanup of the group would
//! reclaim, and how many of its files are currently marked. When the listing
//! is empty the row is replaced by a placeholder explaining why.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
};

use duprev_core::types::{DuplicateGroup, ScanState};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::format::human_bytes;
use crate::ui::layout::panel_block;

/// Renders the duplicate-group panel.
///
/// Uses `render_stateful_widget` so the ListState selection highlight and
/// scroll offset are applied. The group count is shown in the panel title,
/// with the active folder filter appended when one is set.
pub fn render_groups(
    frame: &mut Frame,
    area: Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Groups;
    let title = panel_title(state);

    let items: Vec<ListItem> = if state.session.is_empty() {
        vec![ListItem::new(Line::styled(
            placeholder(state),
            Style::default().fg(theme.file_meta),
        ))]
    } else {
        state
            .session
            .groups()
            .iter()
            .map(|g| group_item(g, state.session.marked_count(&g.hash), theme))
            .collect()
    };

    let list = List::new(items)
        .block(panel_block(&title, is_focused, theme))
        .highlight_style(Style::default().fg(theme.border_active));

    frame.render_stateful_widget(list, area, &mut state.group_list_state);
}

fn panel_title(state: &AppState) -> String {
    let mut title = if state.session.is_empty() {
        "Groups".to_owned()
    } else {
        format!("Groups ({})", state.session.len())
    };
    if let Some(folder) = &state.folder_filter {
        title.push_str(&format!(" [{}]", folder));
    }
    title
}

/// Explains an empty listing: a load in flight, a failed load, or simply
/// nothing found yet.
fn placeholder(state: &AppState) -> &'static str {
    if state.session.is_loading() {
        "Loading..."
    } else if state.session.load_error().is_some() {
        "Load failed, press r to retry"
    } else {
        match state.poller.state() {
            ScanState::Idle => "No scan yet, press s to scan",
            ScanState::Scanning => "Scan in progress...",
            _ => "No duplicates found",
        }
    }
}

/// Converts one group into a styled ListItem.
///
/// Format: `4 copies  save 2.29 MB  0123abcd  3 to delete`. The marked
/// count turns into a dim `none marked` when the group is untouched.
fn group_item(group: &DuplicateGroup, marked: usize, theme: &Theme) -> ListItem<'static> {
    let copies = Span::raw(format!("{} copies", group.files.len()));
    let save = Span::styled(
        format!("  save {}", human_bytes(group.reclaimable_size)),
        Style::default().fg(theme.size_accent),
    );
    let hash = Span::styled(
        format!("  {:.8}", group.hash),
        Style::default().fg(theme.file_meta),
    );
    let marks = if marked > 0 {
        Span::styled(
            format!("  {} to delete", marked),
            Style::default().fg(theme.mark_delete),
        )
    } else {
        Span::styled("  none marked", Style::default().fg(theme.file_meta))
    };
    ListItem::new(Line::from(vec![copies, save, hash, marks]))
}
