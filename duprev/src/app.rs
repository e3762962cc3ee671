//! Central application state for duprev.
//!
//! This module owns all mutable UI state: the active screen and mode, panel
//! focus and cursors, the review session, the scan poller, and the transient
//! status line. No ratatui rendering logic lives here — `app.rs` is pure
//! state that is read by the render module and mutated by the keybinding
//! dispatcher and by [`AppState::apply_api_outcome`], the single funnel every
//! API worker response passes through.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use duprev_core::poller::ScanPoller;
use duprev_core::session::{LoadOutcome, ReviewSession};
use duprev_core::types::{
    DashboardStats, DuplicateGroup, DuplicatesFilter, FileRecord, ScanState, UserInfo,
};

use crate::api::types::{ApiOutcome, ApiRequest};

/// Top-level screen switch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Sign-in screen. The app starts here until the session probe answers.
    #[default]
    Login,
    /// The duplicate review dashboard.
    Dashboard,
}

/// Input mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal vim-style navigation mode (default).
    #[default]
    Normal,
    /// Typing a folder filter into the input line.
    FilterInput,
    /// Deletion confirmation dialog is open.
    ConfirmDelete,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
    /// Quit-confirmation dialog shown while a delete is still in flight.
    ConfirmQuit,
}

/// Which panel currently has keyboard focus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel listing duplicate groups.
    #[default]
    Groups,
    /// Right panel listing the files of the selected group.
    Files,
}

impl PanelFocus {
    /// Returns the other panel. With two panels, next and prev coincide.
    pub fn next(self) -> Self {
        match self {
            PanelFocus::Groups => PanelFocus::Files,
            PanelFocus::Files => PanelFocus::Groups,
        }
    }

    pub fn prev(self) -> Self {
        self.next()
    }
}

/// Severity of the transient status-bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// A short-lived message rendered in the status bar until `expires_at`.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
    pub expires_at: Instant,
}

/// All mutable UI state passed through every render cycle.
///
/// Bundled so the render function receives a single mutable reference (it
/// caches panel geometry back into the state) and the keybinding dispatcher
/// receives the same. Methods that depend on time take `now` explicitly,
/// which keeps the scan-poll scheduling and status expiry testable.
pub struct AppState {
    /// Which screen is visible.
    pub screen: Screen,
    /// Current input mode governing which keybindings are active.
    pub mode: Mode,
    /// Which panel currently receives scroll/navigation events.
    pub focus: PanelFocus,

    /// Loaded duplicate groups plus the keep/delete selection.
    pub session: ReviewSession,
    /// Scan progress and poll scheduling.
    pub poller: ScanPoller,

    /// The signed-in account, once the session probe succeeds.
    pub user: Option<UserInfo>,
    /// Aggregate numbers for the header strip.
    pub stats: Option<DashboardStats>,
    /// Provider sign-in URL shown on the login screen.
    pub login_url: Option<String>,
    /// Error from the last sign-in probe, shown on the login screen.
    pub login_error: Option<String>,
    /// Backend base URL, shown on the login screen.
    pub backend_url: String,

    /// Edit buffer while `Mode::FilterInput` is active.
    pub filter_input: String,
    /// The folder filter currently applied to the listing.
    pub folder_filter: Option<String>,

    /// Stateful list widget backing the groups panel (left).
    pub group_list_state: ListState,
    /// Stateful list widget backing the files panel (right).
    pub file_list_state: ListState,

    /// Inner height of the groups panel after borders, cached per render.
    pub groups_viewport_height: u16,
    /// Inner height of the files panel after borders, cached per render.
    pub files_viewport_height: u16,
    /// Screen rectangles of [groups, files], cached per render for mouse
    /// hit-testing.
    pub panel_rects: [Rect; 2],
    /// Scroll offset of the help overlay.
    pub help_scroll: u16,

    /// Transient status-bar message.
    pub status_line: Option<StatusLine>,
    /// True between sending a delete request and receiving its outcome.
    /// Guards the quit path and blocks a second delete.
    pub delete_in_flight: bool,

    /// Send half of the API worker channel. `None` only in tests that never
    /// wire a worker.
    pub api_tx: Option<UnboundedSender<ApiRequest>>,

    poll_interval: Duration,
}

impl AppState {
    pub fn new(poll_interval: Duration, backend_url: String) -> Self {
        Self {
            screen: Screen::default(),
            mode: Mode::default(),
            focus: PanelFocus::default(),
            session: ReviewSession::new(),
            poller: ScanPoller::new(poll_interval),
            user: None,
            stats: None,
            login_url: None,
            login_error: None,
            backend_url,
            filter_input: String::new(),
            folder_filter: None,
            group_list_state: ListState::default(),
            file_list_state: ListState::default(),
            groups_viewport_height: 0,
            files_viewport_height: 0,
            panel_rects: [Rect::default(); 2],
            help_scroll: 0,
            status_line: None,
            delete_in_flight: false,
            api_tx: None,
            poll_interval,
        }
    }

    /// Sends a request to the API worker. Dropped silently when the worker
    /// is gone, which only happens during shutdown.
    pub fn request(&self, request: ApiRequest) {
        if let Some(tx) = &self.api_tx {
            if tx.send(request).is_err() {
                debug!("api worker channel closed");
            }
        }
    }

    /// The group under the cursor.
    pub fn current_group(&self) -> Option<&DuplicateGroup> {
        self.session.group_at(self.group_list_state.selected()?)
    }

    /// The file under the cursor within the current group.
    pub fn current_file(&self) -> Option<&FileRecord> {
        self.current_group()?
            .files
            .get(self.file_list_state.selected()?)
    }

    /// Scrolls the focused panel down by `lines` rows. Moving the group
    /// cursor resets the file cursor to the top of the new group.
    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Groups => {
                let before = self.group_list_state.selected();
                self.group_list_state.scroll_down_by(lines);
                self.clamp_group_cursor();
                if self.group_list_state.selected() != before {
                    self.reset_file_cursor();
                }
            }
            PanelFocus::Files => {
                self.file_list_state.scroll_down_by(lines);
                self.clamp_file_cursor();
            }
        }
    }

    /// Scrolls the focused panel up by `lines` rows.
    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Groups => {
                let before = self.group_list_state.selected();
                self.group_list_state.scroll_up_by(lines);
                self.clamp_group_cursor();
                if self.group_list_state.selected() != before {
                    self.reset_file_cursor();
                }
            }
            PanelFocus::Files => {
                self.file_list_state.scroll_up_by(lines);
                self.clamp_file_cursor();
            }
        }
    }

    /// Jumps the focused panel's cursor to the first row.
    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Groups => {
                self.group_list_state.select_first();
                self.clamp_group_cursor();
                self.reset_file_cursor();
            }
            PanelFocus::Files => {
                self.file_list_state.select_first();
                self.clamp_file_cursor();
            }
        }
    }

    /// Jumps the focused panel's cursor to the last row.
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Groups => {
                let last = self.session.len().saturating_sub(1);
                if !self.session.is_empty() {
                    self.group_list_state.select(Some(last));
                    self.reset_file_cursor();
                }
            }
            PanelFocus::Files => {
                let count = self.current_group().map_or(0, |g| g.files.len());
                if count > 0 {
                    self.file_list_state.select(Some(count - 1));
                }
            }
        }
    }

    /// Scrolls the focused panel by half its visible height, using the
    /// viewport height cached from the previous render. Scrolls by 1 on the
    /// first frame, before any height is known.
    pub fn half_page_down(&mut self) {
        let half = self.focused_viewport_height() / 2;
        self.scroll_down(half.max(1));
    }

    pub fn half_page_up(&mut self) {
        let half = self.focused_viewport_height() / 2;
        self.scroll_up(half.max(1));
    }

    fn focused_viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Groups => self.groups_viewport_height,
            PanelFocus::Files => self.files_viewport_height,
        }
    }

    /// Flips the file under the cursor between kept and marked. Explains
    /// itself in the status bar when the session rejects the edit.
    pub fn toggle_current_file(&mut self, now: Instant) {
        let Some((hash, file_id)) = self.current_ids() else {
            return;
        };
        if !self.session.toggle_keep(&hash, &file_id) {
            self.set_status(
                StatusKind::Info,
                "every group must keep at least one copy",
                now,
            );
        }
    }

    /// Group-wide mark/unmark toggle for the group under the cursor.
    pub fn toggle_current_group(&mut self) {
        if let Some(hash) = self.current_group().map(|g| g.hash.clone()) {
            self.session.toggle_group_selection(&hash);
        }
    }

    pub fn select_all(&mut self) {
        self.session.select_all_duplicates();
    }

    pub fn clear_marks(&mut self) {
        self.session.clear_selection();
    }

    /// Opens the filter input prefilled with the applied filter, so editing
    /// it does not mean retyping it.
    pub fn begin_filter_input(&mut self) {
        self.filter_input = self.folder_filter.clone().unwrap_or_default();
        self.mode = Mode::FilterInput;
    }

    /// Applies the typed filter and reloads. An empty input clears the
    /// filter.
    pub fn apply_filter(&mut self) {
        let trimmed = self.filter_input.trim();
        self.folder_filter = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self.mode = Mode::Normal;
        self.reload_duplicates();
    }

    pub fn cancel_filter_input(&mut self) {
        self.mode = Mode::Normal;
    }

    /// The filter currently in effect, as wire-ready criteria.
    pub fn current_filter(&self) -> DuplicatesFilter {
        self.folder_filter
            .as_deref()
            .map(DuplicatesFilter::folder)
            .unwrap_or_default()
    }

    /// Starts a new sequenced load for the current filter.
    pub fn reload_duplicates(&mut self) {
        let filter = self.current_filter();
        let seq = self.session.begin_load(filter.clone());
        self.request(ApiRequest::LoadDuplicates { seq, filter });
    }

    /// Reloads the listing and the header stats.
    pub fn refresh(&mut self) {
        self.reload_duplicates();
        self.request(ApiRequest::Stats);
    }

    /// Starts a scan, or resets-and-starts after a finished one. Rejected
    /// with a status message while a scan is running.
    pub fn start_scan(&mut self, now: Instant) {
        match self.poller.state() {
            ScanState::Scanning => {
                self.set_status(StatusKind::Info, "a scan is already running", now);
            }
            ScanState::Idle => {
                self.poller.start(now);
                self.request(ApiRequest::StartScan);
            }
            ScanState::Complete | ScanState::Error => {
                self.poller.reset();
                self.request(ApiRequest::ResetScan);
                self.poller.start(now);
                self.request(ApiRequest::StartScan);
            }
        }
    }

    /// Opens the delete confirmation, unless there is nothing to delete or
    /// a delete is already running.
    pub fn open_delete_confirm(&mut self, now: Instant) {
        if self.delete_in_flight {
            self.set_status(StatusKind::Info, "a delete is already in progress", now);
            return;
        }
        if self.session.marked_total() == 0 {
            self.set_status(StatusKind::Info, "no files are marked for deletion", now);
            return;
        }
        self.mode = Mode::ConfirmDelete;
    }

    /// Sends the delete for every marked file. Called from the confirmation
    /// dialog's yes-path only.
    pub fn confirm_delete(&mut self, now: Instant) {
        self.mode = Mode::Normal;
        let ids = self.session.files_to_delete();
        if ids.is_empty() {
            return;
        }
        self.delete_in_flight = true;
        self.set_status(
            StatusKind::Info,
            format!("deleting {} file(s)", ids.len()),
            now,
        );
        self.request(ApiRequest::DeleteFiles(ids));
    }

    /// Whether quitting needs a confirmation dialog right now.
    pub fn quit_needs_confirm(&self) -> bool {
        self.delete_in_flight
    }

    pub fn logout(&mut self) {
        self.request(ApiRequest::Logout);
    }

    /// Re-probes the session from the login screen, after the user finished
    /// signing in through the browser.
    pub fn retry_sign_in(&mut self) {
        self.login_error = None;
        self.request(ApiRequest::CurrentUser);
    }

    /// Logic tick: consults the poller's schedule and expires the status
    /// line. Called at 4 Hz from the main loop.
    pub fn tick(&mut self, now: Instant) {
        if self.screen == Screen::Dashboard && self.poller.poll_due(now) {
            self.poller.mark_issued();
            self.request(ApiRequest::ScanStatus);
        }
        if self
            .status_line
            .as_ref()
            .is_some_and(|s| now >= s.expires_at)
        {
            self.status_line = None;
        }
    }

    /// Puts a transient message in the status bar. Errors linger longer.
    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>, now: Instant) {
        let ttl = match kind {
            StatusKind::Error => Duration::from_secs(8),
            _ => Duration::from_secs(4),
        };
        self.status_line = Some(StatusLine {
            text: text.into(),
            kind,
            expires_at: now + ttl,
        });
    }

    /// The single funnel for API worker responses.
    ///
    /// Routing rules: any `Unauthenticated` answer sends the app back to the
    /// login screen; the scan-completion edge triggers the duplicates reload;
    /// stats failures degrade to a stale header without comment (the worker
    /// already logged them).
    pub fn apply_api_outcome(&mut self, outcome: ApiOutcome, now: Instant) {
        match outcome {
            ApiOutcome::CurrentUser(Ok(user)) => {
                self.user = Some(user);
                self.login_error = None;
                self.screen = Screen::Dashboard;
                self.request(ApiRequest::Stats);
                self.request(ApiRequest::ScanStatus);
            }
            ApiOutcome::CurrentUser(Err(e)) => {
                if !e.is_unauthenticated() {
                    self.login_error = Some(e.to_string());
                }
                self.force_login();
            }
            ApiOutcome::LoginUrl(Ok(url)) => {
                self.login_url = Some(url);
            }
            ApiOutcome::LoginUrl(Err(e)) => {
                self.login_error = Some(e.to_string());
            }
            ApiOutcome::Logout(Ok(())) => {
                self.login_url = None;
                self.force_login();
                self.set_status(StatusKind::Success, "signed out", now);
            }
            ApiOutcome::Logout(Err(e)) => {
                self.set_status(StatusKind::Error, format!("sign-out failed: {e}"), now);
            }
            ApiOutcome::ScanStarted(Ok(())) => {}
            ApiOutcome::ScanStarted(Err(e)) => {
                if e.is_conflict() {
                    // Another client got there first; the next poll syncs us.
                    self.set_status(StatusKind::Info, "a scan is already running", now);
                } else if e.is_unauthenticated() {
                    self.force_login();
                } else {
                    self.poller.abort_start();
                    self.set_status(StatusKind::Error, format!("could not start scan: {e}"), now);
                }
            }
            ApiOutcome::ScanStatus(Ok(status)) => match self.poller.apply_status(status, now) {
                Some(ScanState::Complete) => {
                    let scanned = self.poller.status().files_scanned;
                    self.set_status(
                        StatusKind::Success,
                        format!("scan complete: {scanned} files scanned"),
                        now,
                    );
                    self.reload_duplicates();
                    self.request(ApiRequest::Stats);
                }
                Some(ScanState::Error) => {
                    let msg = self
                        .poller
                        .status()
                        .message
                        .clone()
                        .unwrap_or_else(|| "scan failed".to_owned());
                    self.set_status(StatusKind::Error, msg, now);
                }
                _ => {}
            },
            ApiOutcome::ScanStatus(Err(e)) => {
                if e.is_unauthenticated() {
                    self.force_login();
                } else {
                    self.poller.apply_poll_error(now);
                }
            }
            ApiOutcome::ScanReset(Ok(())) => {}
            ApiOutcome::ScanReset(Err(e)) => {
                self.set_status(StatusKind::Error, format!("scan reset failed: {e}"), now);
            }
            ApiOutcome::Duplicates { seq, result } => {
                if result
                    .as_ref()
                    .is_err_and(|e| e.is_unauthenticated())
                {
                    // force_login replaces the whole session, pending load
                    // included.
                    self.force_login();
                    return;
                }
                match self.session.apply_load(seq, result) {
                    LoadOutcome::Applied(count) => {
                        self.reconcile_cursors();
                        let noun = if count == 1 { "group" } else { "groups" };
                        self.set_status(
                            StatusKind::Info,
                            format!("{count} duplicate {noun}"),
                            now,
                        );
                    }
                    LoadOutcome::Failed => {
                        self.set_status(
                            StatusKind::Error,
                            "could not load duplicates, press r to retry",
                            now,
                        );
                    }
                    LoadOutcome::Stale => {}
                }
            }
            ApiOutcome::Stats(Ok(stats)) => {
                self.stats = Some(stats);
            }
            ApiOutcome::Stats(Err(_)) => {}
            ApiOutcome::Deleted(Ok(outcome)) => {
                self.delete_in_flight = false;
                let (deleted, failed) = self.session.apply_delete(&outcome);
                if failed == 0 {
                    self.set_status(StatusKind::Success, format!("deleted {deleted} file(s)"), now);
                } else {
                    self.set_status(
                        StatusKind::Error,
                        format!("deleted {deleted} file(s), {failed} failed"),
                        now,
                    );
                }
                self.reload_duplicates();
                self.request(ApiRequest::Stats);
            }
            ApiOutcome::Deleted(Err(e)) => {
                self.delete_in_flight = false;
                if e.is_unauthenticated() {
                    self.force_login();
                } else {
                    // Selection is untouched, so the user can just retry.
                    self.set_status(StatusKind::Error, format!("delete failed: {e}"), now);
                }
            }
        }
    }

    /// Drops back to the login screen, clearing account-scoped state and
    /// stopping any polling. Fetches a fresh sign-in URL if none is held.
    fn force_login(&mut self) {
        self.screen = Screen::Login;
        self.mode = Mode::Normal;
        self.user = None;
        self.stats = None;
        self.session = ReviewSession::new();
        self.poller = ScanPoller::new(self.poll_interval);
        self.folder_filter = None;
        self.delete_in_flight = false;
        self.group_list_state.select(None);
        self.file_list_state.select(None);
        if self.login_url.is_none() {
            self.request(ApiRequest::LoginUrl);
        }
    }

    fn current_ids(&self) -> Option<(String, String)> {
        let group = self.current_group()?;
        let file = group.files.get(self.file_list_state.selected()?)?;
        Some((group.hash.clone(), file.id.clone()))
    }

    /// Clamps both cursors into the freshly loaded listing, keeping the
    /// user's place when the group count shrinks.
    fn reconcile_cursors(&mut self) {
        if self.session.is_empty() {
            self.group_list_state.select(None);
            self.file_list_state.select(None);
            return;
        }
        let group_idx = self
            .group_list_state
            .selected()
            .unwrap_or(0)
            .min(self.session.len() - 1);
        self.group_list_state.select(Some(group_idx));
        self.clamp_file_cursor();
    }

    fn clamp_group_cursor(&mut self) {
        if self.session.is_empty() {
            self.group_list_state.select(None);
            return;
        }
        let idx = self
            .group_list_state
            .selected()
            .unwrap_or(0)
            .min(self.session.len() - 1);
        self.group_list_state.select(Some(idx));
    }

    fn clamp_file_cursor(&mut self) {
        let count = self.current_group().map_or(0, |g| g.files.len());
        if count == 0 {
            self.file_list_state.select(None);
            return;
        }
        let idx = self.file_list_state.selected().unwrap_or(0).min(count - 1);
        self.file_list_state.select(Some(idx));
    }

    fn reset_file_cursor(&mut self) {
        let has_files = self.current_group().is_some_and(|g| !g.files.is_empty());
        self.file_list_state
            .select(has_files.then_some(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use duprev_core::error::ApiError;
    use duprev_core::poller::DEFAULT_POLL_INTERVAL;
    use duprev_core::types::{DeleteOutcome, ScanStatus, UserInfo};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn wired_state() -> (AppState, UnboundedReceiver<ApiRequest>) {
        let (tx, rx) = unbounded_channel();
        let mut state = AppState::new(DEFAULT_POLL_INTERVAL, "http://localhost:8000".into());
        state.api_tx = Some(tx);
        (state, rx)
    }

    fn user() -> UserInfo {
        UserInfo {
            name: "Pat".into(),
            email: "pat@example.com".into(),
            photo_url: None,
        }
    }

    fn sample_group() -> DuplicateGroup {
        let mk = |id: &str| FileRecord {
            id: id.to_owned(),
            name: format!("{id}.bin"),
            path: format!("/data/{id}.bin"),
            size: 64,
            last_modified: Utc::now(),
            hash: None,
            mime_type: None,
            thumbnail_url: None,
            parent_id: None,
        };
        DuplicateGroup {
            hash: "h1".into(),
            files: vec![mk("f1"), mk("f2")],
            total_size: 128,
            reclaimable_size: 64,
            suggested_keep_id: "f1".into(),
        }
    }

    fn drain(rx: &mut UnboundedReceiver<ApiRequest>) -> Vec<ApiRequest> {
        let mut out = Vec::new();
        while let Ok(req) = rx.try_recv() {
            out.push(req);
        }
        out
    }

    #[test]
    fn sign_in_unlocks_the_dashboard_and_probes_backend_state() {
        let (mut state, mut rx) = wired_state();
        let now = Instant::now();
        state.apply_api_outcome(ApiOutcome::CurrentUser(Ok(user())), now);

        assert_eq!(state.screen, Screen::Dashboard);
        let requests = drain(&mut rx);
        assert!(matches!(requests[0], ApiRequest::Stats));
        assert!(matches!(requests[1], ApiRequest::ScanStatus));
    }

    #[test]
    fn scan_completion_edge_triggers_the_duplicates_reload() {
        let (mut state, mut rx) = wired_state();
        let now = Instant::now();
        state.screen = Screen::Dashboard;
        state.poller.start(now);
        state.poller.mark_issued();
        drain(&mut rx);

        let done = ScanStatus {
            status: ScanState::Complete,
            files_scanned: 9,
            total_files: Some(9),
            message: None,
        };
        state.apply_api_outcome(ApiOutcome::ScanStatus(Ok(done)), now);

        assert!(state.session.is_loading());
        let requests = drain(&mut rx);
        assert!(matches!(
            requests[0],
            ApiRequest::LoadDuplicates { seq: 1, .. }
        ));
        assert!(matches!(requests[1], ApiRequest::Stats));
    }

    #[test]
    fn an_expired_session_routes_back_to_login() {
        let (mut state, mut rx) = wired_state();
        let now = Instant::now();
        state.screen = Screen::Dashboard;
        state.user = Some(user());

        state.apply_api_outcome(ApiOutcome::ScanStatus(Err(ApiError::Unauthenticated)), now);

        assert_eq!(state.screen, Screen::Login);
        assert!(state.user.is_none());
        let requests = drain(&mut rx);
        assert!(matches!(requests[0], ApiRequest::LoginUrl));
    }

    #[test]
    fn delete_success_clears_marks_and_resynchronizes() {
        let (mut state, mut rx) = wired_state();
        let now = Instant::now();
        state.screen = Screen::Dashboard;
        let seq = state.session.begin_load(DuplicatesFilter::default());
        state.session.apply_load(seq, Ok(vec![sample_group()]));
        assert_eq!(state.session.marked_total(), 1);
        state.delete_in_flight = true;
        drain(&mut rx);

        let outcome = DeleteOutcome {
            deleted: vec!["f2".into()],
            failed: vec![],
        };
        state.apply_api_outcome(ApiOutcome::Deleted(Ok(outcome)), now);

        assert!(!state.delete_in_flight);
        assert_eq!(state.session.marked_total(), 0);
        let requests = drain(&mut rx);
        assert!(matches!(requests[0], ApiRequest::LoadDuplicates { .. }));
        assert!(matches!(requests[1], ApiRequest::Stats));
    }

    #[test]
    fn start_conflict_keeps_polling_other_failures_roll_back() {
        let (mut state, _rx) = wired_state();
        let now = Instant::now();
        state.poller.start(now);
        state.apply_api_outcome(
            ApiOutcome::ScanStarted(Err(ApiError::RequestFailed {
                status: 409,
                body: "scan already in progress".into(),
            })),
            now,
        );
        assert!(state.poller.is_scanning(), "409 means a scan is running");

        state.apply_api_outcome(
            ApiOutcome::ScanStarted(Err(ApiError::RequestFailed {
                status: 500,
                body: "boom".into(),
            })),
            now,
        );
        assert_eq!(state.poller.state(), ScanState::Idle);
    }
}
