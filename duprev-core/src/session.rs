use std::collections::{HashMap, HashSet};

use crate::error::ApiError;
use crate::types::{DeleteOutcome, DuplicateGroup, DuplicatesFilter, FileRecord};

/// What a call to [`ReviewSession::apply_load`] did with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was current and replaced the group list.
    Applied(usize),
    /// The response was current but carried an error; prior groups stand.
    Failed,
    /// The response belonged to a superseded load and was discarded.
    Stale,
}

/// Per-group selection: the ids the user keeps. Everything else in the
/// group is marked for deletion.
#[derive(Debug, Clone)]
struct GroupSelection {
    kept: HashSet<String>,
    /// Selection displaced by the group-wide toggle, so toggling twice in a
    /// row restores it. Any other edit to the group drops the stash.
    stash: Option<HashSet<String>>,
}

/// One review pass over the duplicate listing.
///
/// Holds the loaded groups and which copy of each the user keeps. Two rules
/// are enforced here rather than in the view:
///
/// - every group always keeps at least one file; the edit that would unmark
///   the last kept copy is rejected
/// - loads are sequenced: each [`begin_load`] hands out a token and only the
///   most recently issued token may replace the groups, so a slow response
///   for an old filter can never clobber a newer one
///
/// A failed load leaves the previous groups on screen with an error marker;
/// stale data beats a blank panel.
///
/// [`begin_load`]: ReviewSession::begin_load
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    groups: Vec<DuplicateGroup>,
    selection: HashMap<String, GroupSelection>,
    filter: DuplicatesFilter,
    next_seq: u64,
    pending: Option<u64>,
    load_error: Option<String>,
}

impl ReviewSession {
    pub fn new() -> Self {
        ReviewSession::default()
    }

    /// Registers a new load for `filter` and returns its sequence token.
    /// The caller issues the request and later feeds the response to
    /// [`apply_load`] together with this token.
    ///
    /// [`apply_load`]: ReviewSession::apply_load
    pub fn begin_load(&mut self, filter: DuplicatesFilter) -> u64 {
        self.next_seq += 1;
        self.pending = Some(self.next_seq);
        self.load_error = None;
        self.filter = filter;
        self.next_seq
    }

    /// Applies a load response. Responses for any token other than the most
    /// recently issued one are discarded unchanged.
    ///
    /// On success the group list is replaced and every selection resets to
    /// its default: keep only the backend-suggested file. Groups that
    /// arrive with fewer than two files are dropped; a group whose
    /// suggestion does not name one of its own files keeps its first file
    /// instead.
    pub fn apply_load(
        &mut self,
        seq: u64,
        result: Result<Vec<DuplicateGroup>, ApiError>,
    ) -> LoadOutcome {
        if self.pending != Some(seq) {
            return LoadOutcome::Stale;
        }
        self.pending = None;
        match result {
            Ok(mut groups) => {
                groups.retain(|g| g.files.len() >= 2);
                self.selection = groups
                    .iter()
                    .map(|g| {
                        (
                            g.hash.clone(),
                            GroupSelection {
                                kept: default_kept(g),
                                stash: None,
                            },
                        )
                    })
                    .collect();
                let count = groups.len();
                self.groups = groups;
                self.load_error = None;
                LoadOutcome::Applied(count)
            }
            Err(e) => {
                self.load_error = Some(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Error text from the last settled load, cleared by the next
    /// [`begin_load`] or a successful apply.
    ///
    /// [`begin_load`]: ReviewSession::begin_load
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// The filter the most recent load was issued with.
    pub fn filter(&self) -> &DuplicatesFilter {
        &self.filter
    }

    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_at(&self, index: usize) -> Option<&DuplicateGroup> {
        self.groups.get(index)
    }

    pub fn is_kept(&self, hash: &str, file_id: &str) -> bool {
        self.selection
            .get(hash)
            .map_or(true, |sel| sel.kept.contains(file_id))
    }

    /// Number of files in the group marked for deletion.
    pub fn marked_count(&self, hash: &str) -> usize {
        let Some(group) = self.find_group(hash) else {
            return 0;
        };
        group
            .files
            .iter()
            .filter(|f| !self.is_kept(hash, &f.id))
            .count()
    }

    /// Flips one file between kept and marked-for-deletion. Returns false
    /// and changes nothing when the edit would unmark the group's last kept
    /// file, or when the hash or id is unknown.
    pub fn toggle_keep(&mut self, hash: &str, file_id: &str) -> bool {
        let Some(group) = self.groups.iter().find(|g| g.hash == hash) else {
            return false;
        };
        if !group.files.iter().any(|f| f.id == file_id) {
            return false;
        }
        let Some(sel) = self.selection.get_mut(hash) else {
            return false;
        };
        sel.stash = None;
        if sel.kept.contains(file_id) {
            if sel.kept.len() == 1 {
                return false;
            }
            sel.kept.remove(file_id);
        } else {
            sel.kept.insert(file_id.to_owned());
        }
        true
    }

    /// Group-wide toggle. When the group is not fully selected, marks every
    /// file except the suggested keep and stashes the old selection; when it
    /// already is, restores the stashed selection, or unmarks the whole
    /// group if there is nothing stashed. Toggling twice in a row therefore
    /// always lands back where it started.
    pub fn toggle_group_selection(&mut self, hash: &str) {
        let Some(group) = self.groups.iter().find(|g| g.hash == hash) else {
            return;
        };
        let fully = default_kept(group);
        let everything: HashSet<String> = group.files.iter().map(|f| f.id.clone()).collect();
        let Some(sel) = self.selection.get_mut(hash) else {
            return;
        };
        if sel.kept == fully {
            sel.kept = sel.stash.take().unwrap_or(everything);
        } else {
            sel.stash = Some(std::mem::replace(&mut sel.kept, fully));
        }
    }

    /// Marks every non-suggested file in every group, or unmarks everything
    /// when all groups are already fully selected.
    pub fn select_all_duplicates(&mut self) {
        let all_selected = self.groups.iter().all(|g| {
            self.selection
                .get(&g.hash)
                .is_some_and(|sel| sel.kept == default_kept(g))
        });
        for group in &self.groups {
            let kept = if all_selected {
                group.files.iter().map(|f| f.id.clone()).collect()
            } else {
                default_kept(group)
            };
            self.selection.insert(
                group.hash.clone(),
                GroupSelection { kept, stash: None },
            );
        }
    }

    /// Unmarks every file in every group.
    pub fn clear_selection(&mut self) {
        for group in &self.groups {
            self.selection.insert(
                group.hash.clone(),
                GroupSelection {
                    kept: group.files.iter().map(|f| f.id.clone()).collect(),
                    stash: None,
                },
            );
        }
    }

    /// Ids of every marked file, in group order then file order. This is
    /// the exact payload for the delete endpoint.
    pub fn files_to_delete(&self) -> Vec<String> {
        self.marked_files().map(|f| f.id.clone()).collect()
    }

    /// The marked files themselves, for the confirmation dialog.
    pub fn marked(&self) -> Vec<&FileRecord> {
        self.marked_files().collect()
    }

    pub fn marked_total(&self) -> usize {
        self.marked_files().count()
    }

    /// Bytes freed if the current selection is deleted.
    pub fn marked_bytes(&self) -> u64 {
        self.marked_files().map(|f| f.size).sum()
    }

    /// Sum of the backend's reclaimable estimate across loaded groups.
    pub fn total_reclaimable(&self) -> u64 {
        self.groups.iter().map(|g| g.reclaimable_size).sum()
    }

    /// Records a completed delete. Counts come back as (deleted, failed).
    ///
    /// The group list is left alone: the backend recomputes groups during
    /// the reload the caller triggers next, dropping any that fell to a
    /// single file. Only the marks are cleared here.
    pub fn apply_delete(&mut self, outcome: &DeleteOutcome) -> (usize, usize) {
        self.clear_selection();
        (outcome.deleted.len(), outcome.failed.len())
    }

    fn find_group(&self, hash: &str) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|g| g.hash == hash)
    }

    fn marked_files(&self) -> impl Iterator<Item = &FileRecord> {
        self.groups.iter().flat_map(move |g| {
            g.files
                .iter()
                .filter(move |f| !self.is_kept(&g.hash, &f.id))
        })
    }
}

/// Default selection for a group: keep only the backend-suggested file,
/// falling back to the first file when the suggestion is not in the group.
fn default_kept(group: &DuplicateGroup) -> HashSet<String> {
    group
        .files
        .iter()
        .any(|f| f.id == group.suggested_keep_id)
        .then(|| group.suggested_keep_id.clone())
        .or_else(|| group.files.first().map(|f| f.id.clone()))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeleteFailure;
    use chrono::Utc;

    fn file(id: &str, size: u64) -> FileRecord {
        FileRecord {
            id: id.to_owned(),
            name: format!("{id}.jpg"),
            path: format!("/photos/{id}.jpg"),
            size,
            last_modified: Utc::now(),
            hash: None,
            mime_type: None,
            thumbnail_url: None,
            parent_id: None,
        }
    }

    fn group(hash: &str, suggested: &str, files: Vec<FileRecord>) -> DuplicateGroup {
        let total: u64 = files.iter().map(|f| f.size).sum();
        let keep = files
            .iter()
            .find(|f| f.id == suggested)
            .map_or(0, |f| f.size);
        DuplicateGroup {
            hash: hash.to_owned(),
            total_size: total,
            reclaimable_size: total - keep,
            suggested_keep_id: suggested.to_owned(),
            files,
        }
    }

    fn loaded(groups: Vec<DuplicateGroup>) -> ReviewSession {
        let mut session = ReviewSession::new();
        let seq = session.begin_load(DuplicatesFilter::default());
        assert!(matches!(
            session.apply_load(seq, Ok(groups)),
            LoadOutcome::Applied(_)
        ));
        session
    }

    fn h1() -> DuplicateGroup {
        group(
            "h1",
            "f1",
            vec![file("f1", 100), file("f2", 100), file("f3", 100)],
        )
    }

    #[test]
    fn default_selection_keeps_only_the_suggested_file() {
        let session = loaded(vec![h1()]);
        assert!(session.is_kept("h1", "f1"));
        assert!(!session.is_kept("h1", "f2"));
        assert_eq!(session.files_to_delete(), vec!["f2", "f3"]);
        assert_eq!(session.marked_bytes(), 200);
        assert_eq!(session.marked_count("h1"), 2);
    }

    #[test]
    fn the_last_kept_file_cannot_be_unmarked() {
        let mut session = loaded(vec![h1()]);
        assert!(!session.toggle_keep("h1", "f1"), "f1 is the only kept file");
        assert!(session.is_kept("h1", "f1"));

        // Keeping a second file makes the first releasable.
        assert!(session.toggle_keep("h1", "f2"));
        assert!(session.toggle_keep("h1", "f1"));
        assert!(!session.is_kept("h1", "f1"));
        assert_eq!(session.files_to_delete(), vec!["f1", "f3"]);
    }

    #[test]
    fn toggles_against_unknown_ids_change_nothing() {
        let mut session = loaded(vec![h1()]);
        assert!(!session.toggle_keep("h1", "nope"));
        assert!(!session.toggle_keep("nope", "f1"));
        session.toggle_group_selection("nope");
        assert_eq!(session.files_to_delete(), vec!["f2", "f3"]);
    }

    #[test]
    fn group_toggle_restores_the_previous_selection() {
        let mut session = loaded(vec![h1()]);
        // Custom state: keep f1 and f2.
        session.toggle_keep("h1", "f2");
        assert_eq!(session.files_to_delete(), vec!["f3"]);

        session.toggle_group_selection("h1");
        assert_eq!(session.files_to_delete(), vec!["f2", "f3"]);
        session.toggle_group_selection("h1");
        assert_eq!(
            session.files_to_delete(),
            vec!["f3"],
            "second toggle restores the pre-toggle selection"
        );
    }

    #[test]
    fn group_toggle_from_default_unmarks_the_group() {
        let mut session = loaded(vec![h1()]);
        session.toggle_group_selection("h1");
        assert!(session.files_to_delete().is_empty());
        session.toggle_group_selection("h1");
        assert_eq!(session.files_to_delete(), vec!["f2", "f3"]);
    }

    #[test]
    fn select_all_flips_between_everything_and_nothing() {
        let g2 = group("h2", "f5", vec![file("f4", 50), file("f5", 50)]);
        let mut session = loaded(vec![h1(), g2]);
        session.toggle_group_selection("h1"); // h1 unmarked, h2 still default

        session.select_all_duplicates();
        assert_eq!(session.files_to_delete(), vec!["f2", "f3", "f4"]);
        session.select_all_duplicates();
        assert!(session.files_to_delete().is_empty());
        session.select_all_duplicates();
        assert_eq!(session.files_to_delete(), vec!["f2", "f3", "f4"]);

        session.clear_selection();
        assert!(session.files_to_delete().is_empty());
        assert_eq!(session.marked_total(), 0);
    }

    #[test]
    fn only_the_newest_load_may_apply() {
        let mut session = loaded(vec![h1()]);
        let docs = session.begin_load(DuplicatesFilter::folder("/Docs"));
        let pics = session.begin_load(DuplicatesFilter::folder("/Pics"));

        let stale = group("h9", "f9", vec![file("f9", 1), file("f8", 1)]);
        assert_eq!(session.apply_load(docs, Ok(vec![stale])), LoadOutcome::Stale);
        assert_eq!(session.len(), 1, "superseded response left groups alone");
        assert_eq!(session.groups()[0].hash, "h1");

        let fresh = group("h2", "f5", vec![file("f4", 50), file("f5", 50)]);
        assert_eq!(
            session.apply_load(pics, Ok(vec![fresh])),
            LoadOutcome::Applied(1)
        );
        assert_eq!(session.groups()[0].hash, "h2");
        assert_eq!(session.filter().folder_path.as_deref(), Some("/Pics"));

        // A duplicate of an already-settled response is also stale.
        assert_eq!(session.apply_load(pics, Ok(vec![])), LoadOutcome::Stale);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn failed_load_keeps_prior_groups_and_surfaces_the_error() {
        let mut session = loaded(vec![h1()]);
        session.toggle_keep("h1", "f2");

        let seq = session.begin_load(DuplicatesFilter::default());
        assert!(session.is_loading());
        assert_eq!(
            session.apply_load(
                seq,
                Err(ApiError::RequestFailed {
                    status: 500,
                    body: "boom".into()
                })
            ),
            LoadOutcome::Failed
        );
        assert!(!session.is_loading());
        assert_eq!(session.len(), 1, "stale groups beat a blank panel");
        assert!(session.load_error().is_some());
        assert_eq!(
            session.files_to_delete(),
            vec!["f3"],
            "selection survives a failed refresh"
        );

        let seq = session.begin_load(DuplicatesFilter::default());
        assert!(session.load_error().is_none(), "retry clears the marker");
        session.apply_load(seq, Ok(vec![h1()]));
        assert_eq!(
            session.files_to_delete(),
            vec!["f2", "f3"],
            "successful reload resets selection to the default"
        );
    }

    #[test]
    fn apply_delete_reports_counts_and_clears_marks() {
        let mut session = loaded(vec![h1()]);
        let outcome = DeleteOutcome {
            deleted: vec!["f2".into()],
            failed: vec![DeleteFailure {
                id: "f3".into(),
                error: "file is locked".into(),
            }],
        };
        assert_eq!(session.apply_delete(&outcome), (1, 1));
        assert!(session.files_to_delete().is_empty());
        assert_eq!(session.len(), 1, "groups wait for the reload to shrink");
    }

    #[test]
    fn malformed_groups_are_tolerated_at_load() {
        let lonely = group("h3", "f7", vec![file("f7", 10)]);
        let bad_hint = group("h4", "missing", vec![file("f8", 10), file("f9", 10)]);
        let session = loaded(vec![lonely, bad_hint]);

        assert_eq!(session.len(), 1, "single-file groups are dropped");
        assert!(
            session.is_kept("h4", "f8"),
            "unknown suggestion falls back to the first file"
        );
        assert_eq!(session.files_to_delete(), vec!["f9"]);
    }
}
