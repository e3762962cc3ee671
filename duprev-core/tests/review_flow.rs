//! Integration test for the end-to-end review flow.
//!
//! Exercises: scan polling from start to completion, loading duplicate
//! groups, editing the keep/delete selection, computing the delete payload,
//! applying the delete outcome, and the reload that follows. The session
//! and poller are driven here exactly the way the TUI event loop drives
//! them, minus the wire.

use std::time::{Duration, Instant};

use chrono::{TimeDelta, Utc};
use duprev_core::poller::ScanPoller;
use duprev_core::session::{LoadOutcome, ReviewSession};
use duprev_core::types::{
    DeleteOutcome, DuplicateGroup, DuplicatesFilter, FileRecord, ScanState, ScanStatus,
};

fn file(id: &str, path: &str, size: u64, age_days: i64) -> FileRecord {
    FileRecord {
        id: id.to_owned(),
        name: path.rsplit('/').next().unwrap().to_owned(),
        path: path.to_owned(),
        size,
        last_modified: Utc::now() - TimeDelta::days(age_days),
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

fn scanning(files_scanned: u64) -> ScanStatus {
    ScanStatus {
        status: ScanState::Scanning,
        files_scanned,
        total_files: None,
        message: None,
    }
}

#[test]
fn full_review_pass() {
    let mut poller = ScanPoller::default();
    let mut session = ReviewSession::new();
    let mut now = Instant::now();

    // Startup probe: backend is idle, so nothing schedules.
    poller.mark_issued();
    assert_eq!(poller.apply_status(ScanStatus::default(), now), None);
    assert!(!poller.poll_due(now + Duration::from_secs(60)));

    // User starts a scan; progress arrives over a few polls.
    assert!(poller.start(now));
    for files in [40, 90] {
        assert!(poller.poll_due(now));
        poller.mark_issued();
        assert_eq!(poller.apply_status(scanning(files), now), None);
        now += Duration::from_millis(1500);
    }
    assert!(poller.poll_due(now));
    poller.mark_issued();
    let done = ScanStatus {
        status: ScanState::Complete,
        files_scanned: 120,
        total_files: Some(120),
        message: None,
    };
    assert_eq!(poller.apply_status(done, now), Some(ScanState::Complete));
    assert!(!poller.poll_due(now + Duration::from_secs(60)));

    // The completion edge triggers the duplicates load.
    let photos = group(
        "aaa111",
        "p1",
        vec![
            file("p1", "/photos/2023/img_0001.jpg", 2_400_000, 400),
            file("p2", "/photos/backup/img_0001.jpg", 2_400_000, 30),
        ],
    );
    let docs = group(
        "bbb222",
        "d1",
        vec![
            file("d1", "/docs/report.pdf", 800_000, 90),
            file("d2", "/docs/old/report.pdf", 800_000, 10),
            file("d3", "/downloads/report (1).pdf", 800_000, 5),
        ],
    );
    let seq = session.begin_load(DuplicatesFilter::default());
    assert!(session.is_loading());
    assert_eq!(
        session.apply_load(seq, Ok(vec![photos, docs])),
        LoadOutcome::Applied(2)
    );
    assert!(!session.is_loading());

    // Defaults keep only the suggested file of each group.
    assert_eq!(session.files_to_delete(), vec!["p2", "d2", "d3"]);
    assert_eq!(session.marked_bytes(), 2_400_000 + 800_000 + 800_000);
    assert_eq!(session.total_reclaimable(), 2_400_000 + 1_600_000);

    // User decides to also keep the downloads copy.
    assert!(session.toggle_keep("bbb222", "d3"));
    assert_eq!(session.files_to_delete(), vec!["p2", "d2"]);
    assert_eq!(session.marked_total(), 2);

    // Delete succeeds for both files; marks clear, groups await the reload.
    let outcome = DeleteOutcome {
        deleted: vec!["p2".into(), "d2".into()],
        failed: vec![],
    };
    assert_eq!(session.apply_delete(&outcome), (2, 0));
    assert!(session.files_to_delete().is_empty());
    assert_eq!(session.len(), 2);

    // Reload: the photos group fell to one file server-side and is gone,
    // the docs group comes back smaller with a fresh suggestion.
    let docs_after = group(
        "bbb222",
        "d1",
        vec![
            file("d1", "/docs/report.pdf", 800_000, 90),
            file("d3", "/downloads/report (1).pdf", 800_000, 5),
        ],
    );
    let seq = session.begin_load(DuplicatesFilter::default());
    assert_eq!(
        session.apply_load(seq, Ok(vec![docs_after])),
        LoadOutcome::Applied(1)
    );
    assert_eq!(session.len(), 1);
    assert_eq!(
        session.files_to_delete(),
        vec!["d3"],
        "selection defaults again after the reload"
    );
}

#[test]
fn filter_change_supersedes_inflight_load() {
    let mut session = ReviewSession::new();
    let seq = session.begin_load(DuplicatesFilter::default());
    let everything = group(
        "aaa111",
        "p1",
        vec![
            file("p1", "/photos/a.jpg", 100, 10),
            file("p2", "/photos/b.jpg", 100, 1),
        ],
    );
    session.apply_load(seq, Ok(vec![everything]));

    // User filters to /Docs, then immediately retargets to /Pics while the
    // first request is still in flight.
    let docs_seq = session.begin_load(DuplicatesFilter::folder("/Docs"));
    let pics_seq = session.begin_load(DuplicatesFilter::folder("/Pics"));

    let docs_groups = vec![group(
        "ddd444",
        "d1",
        vec![
            file("d1", "/Docs/a.txt", 10, 5),
            file("d2", "/Docs/b.txt", 10, 1),
        ],
    )];
    assert_eq!(
        session.apply_load(docs_seq, Ok(docs_groups)),
        LoadOutcome::Stale,
        "the /Docs response lost the race and must not land"
    );
    assert_eq!(session.groups()[0].hash, "aaa111");
    assert!(session.is_loading(), "the /Pics load is still pending");

    let pics_groups = vec![group(
        "ppp555",
        "x1",
        vec![
            file("x1", "/Pics/a.png", 20, 5),
            file("x2", "/Pics/b.png", 20, 1),
        ],
    )];
    assert_eq!(
        session.apply_load(pics_seq, Ok(pics_groups)),
        LoadOutcome::Applied(1)
    );
    assert_eq!(session.groups()[0].hash, "ppp555");
    assert_eq!(session.filter().folder_path.as_deref(), Some("/Pics"));
}

#[test]
fn scan_error_ends_polling_and_reset_reenables_start() {
    let mut poller = ScanPoller::default();
    let now = Instant::now();
    assert!(poller.start(now));
    poller.mark_issued();

    let failed = ScanStatus {
        status: ScanState::Error,
        files_scanned: 12,
        total_files: None,
        message: Some("drive went away".into()),
    };
    assert_eq!(poller.apply_status(failed, now), Some(ScanState::Error));
    assert!(!poller.poll_due(now + Duration::from_secs(60)));
    assert_eq!(
        poller.status().message.as_deref(),
        Some("drive went away")
    );

    assert!(!poller.start(now), "a failed scan must be reset first");
    assert!(poller.reset());
    assert!(poller.start(now));
}
