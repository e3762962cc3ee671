use std::time::{Duration, Instant};

use crate::types::{ScanState, ScanStatus};

/// How often scan-status polls fire while a scan is running.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Schedules scan-status polling and tracks the latest progress snapshot.
///
/// The poller performs no IO itself. The caller asks [`poll_due`] on its own
/// clock tick, issues the status request when told to, and feeds the answer
/// back through [`apply_status`] or [`apply_poll_error`]. Timing rules:
///
/// - at most one status request is outstanding at a time; a slow response
///   never stacks a second request behind it
/// - the next poll is scheduled from the moment a response lands, not from
///   when the request was issued
/// - a failed poll is retried on the regular schedule, never reported
/// - reaching `complete` or `error` stops polling and is reported exactly
///   once, so the caller can trigger a duplicates reload on that edge
///
/// [`poll_due`]: ScanPoller::poll_due
/// [`apply_status`]: ScanPoller::apply_status
/// [`apply_poll_error`]: ScanPoller::apply_poll_error
#[derive(Debug, Clone)]
pub struct ScanPoller {
    status: ScanStatus,
    interval: Duration,
    outstanding: bool,
    next_poll_at: Option<Instant>,
}

impl ScanPoller {
    pub fn new(interval: Duration) -> Self {
        ScanPoller {
            status: ScanStatus::default(),
            interval,
            outstanding: false,
            next_poll_at: None,
        }
    }

    /// Latest snapshot observed from the backend, or the idle default.
    pub fn status(&self) -> &ScanStatus {
        &self.status
    }

    pub fn state(&self) -> ScanState {
        self.status.status
    }

    pub fn is_scanning(&self) -> bool {
        self.status.status == ScanState::Scanning
    }

    /// Locally enters the scanning phase and arms an immediate first poll.
    /// Returns false without side effects unless the poller is idle; a
    /// finished scan must be [`reset`] first.
    ///
    /// The caller is responsible for issuing the actual start-scan request.
    ///
    /// [`reset`]: ScanPoller::reset
    pub fn start(&mut self, now: Instant) -> bool {
        if self.status.status != ScanState::Idle {
            return false;
        }
        self.status = ScanStatus {
            status: ScanState::Scanning,
            ..ScanStatus::default()
        };
        self.outstanding = false;
        self.next_poll_at = Some(now);
        true
    }

    /// Rolls back a [`start`] whose start-scan request failed to land.
    ///
    /// [`start`]: ScanPoller::start
    pub fn abort_start(&mut self) {
        if self.status.status == ScanState::Scanning {
            self.status = ScanStatus::default();
            self.outstanding = false;
            self.next_poll_at = None;
        }
    }

    /// Returns to idle after a finished scan, re-enabling [`start`]. No-op
    /// while idle or scanning.
    ///
    /// [`start`]: ScanPoller::start
    pub fn reset(&mut self) -> bool {
        if !self.status.status.is_terminal() {
            return false;
        }
        self.status = ScanStatus::default();
        self.outstanding = false;
        self.next_poll_at = None;
        true
    }

    /// True when a status request should be issued now. Never true while a
    /// previous request is still outstanding.
    pub fn poll_due(&self, now: Instant) -> bool {
        !self.outstanding && self.next_poll_at.is_some_and(|at| now >= at)
    }

    /// Records that the caller issued the status request [`poll_due`] asked
    /// for. Nothing is due again until the response is applied.
    ///
    /// [`poll_due`]: ScanPoller::poll_due
    pub fn mark_issued(&mut self) {
        self.outstanding = true;
        self.next_poll_at = None;
    }

    /// Applies a status response. Returns the terminal state on the exact
    /// response that ended the scan, `None` otherwise.
    ///
    /// Also adopts backend state the poller did not initiate: a one-off
    /// status fetch at startup that says `scanning` resumes polling, and one
    /// that says `complete` reports the terminal edge so duplicates load.
    pub fn apply_status(&mut self, status: ScanStatus, now: Instant) -> Option<ScanState> {
        self.outstanding = false;
        let previous = self.status.status;
        let current = status.status;
        self.status = status;
        match current {
            ScanState::Scanning => {
                self.next_poll_at = Some(now + self.interval);
                None
            }
            ScanState::Idle => {
                self.next_poll_at = None;
                None
            }
            ScanState::Complete | ScanState::Error => {
                self.next_poll_at = None;
                (previous != current).then_some(current)
            }
        }
    }

    /// Swallows a failed poll and schedules the next one. A flaky network
    /// mid-scan degrades to a stale progress number, not an aborted scan.
    pub fn apply_poll_error(&mut self, now: Instant) {
        self.outstanding = false;
        if self.status.status == ScanState::Scanning {
            self.next_poll_at = Some(now + self.interval);
        } else {
            self.next_poll_at = None;
        }
    }
}

impl Default for ScanPoller {
    fn default() -> Self {
        ScanPoller::new(DEFAULT_POLL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanning(files_scanned: u64) -> ScanStatus {
        ScanStatus {
            status: ScanState::Scanning,
            files_scanned,
            total_files: None,
            message: None,
        }
    }

    fn complete(files_scanned: u64) -> ScanStatus {
        ScanStatus {
            status: ScanState::Complete,
            files_scanned,
            total_files: Some(files_scanned),
            message: None,
        }
    }

    /// Drives one full poll round-trip and returns the transition report.
    fn round_trip(
        poller: &mut ScanPoller,
        at: Instant,
        response: ScanStatus,
    ) -> Option<ScanState> {
        assert!(poller.poll_due(at), "poll should be due");
        poller.mark_issued();
        poller.apply_status(response, at)
    }

    #[test]
    fn scan_polls_until_complete_then_stops() {
        let mut poller = ScanPoller::new(Duration::from_millis(1500));
        let t0 = Instant::now();
        assert!(!poller.poll_due(t0), "idle poller has nothing to poll");

        assert!(poller.start(t0));
        assert!(poller.is_scanning());

        // Progress responses at 10, 55, 120 files, then completion.
        let mut at = t0;
        for files in [10, 55, 120] {
            assert_eq!(round_trip(&mut poller, at, scanning(files)), None);
            assert_eq!(poller.status().files_scanned, files);
            at += Duration::from_millis(1500);
        }
        assert_eq!(
            round_trip(&mut poller, at, complete(120)),
            Some(ScanState::Complete)
        );
        assert!(!poller.poll_due(at + Duration::from_secs(60)));
        assert_eq!(poller.state(), ScanState::Complete);
    }

    #[test]
    fn no_overlapping_requests_while_one_is_outstanding() {
        let mut poller = ScanPoller::new(Duration::from_millis(1500));
        let t0 = Instant::now();
        poller.start(t0);
        assert!(poller.poll_due(t0));
        poller.mark_issued();

        // Deadline passes with the response still in flight.
        let late = t0 + Duration::from_secs(10);
        assert!(!poller.poll_due(late));

        // Next poll is scheduled from response arrival, not from issue time.
        poller.apply_status(scanning(5), late);
        assert!(!poller.poll_due(late + Duration::from_millis(1499)));
        assert!(poller.poll_due(late + Duration::from_millis(1500)));
    }

    #[test]
    fn poll_failure_is_swallowed_and_retried() {
        let mut poller = ScanPoller::new(Duration::from_millis(1500));
        let t0 = Instant::now();
        poller.start(t0);
        poller.mark_issued();

        poller.apply_poll_error(t0);
        assert!(poller.is_scanning(), "a failed poll does not end the scan");
        assert!(poller.poll_due(t0 + Duration::from_millis(1500)));
    }

    #[test]
    fn terminal_state_is_reported_exactly_once() {
        let mut poller = ScanPoller::new(Duration::from_millis(1500));
        let t0 = Instant::now();
        poller.start(t0);
        poller.mark_issued();
        assert_eq!(
            poller.apply_status(complete(3), t0),
            Some(ScanState::Complete)
        );
        // A manual refresh that sees the same terminal state again is quiet.
        poller.mark_issued();
        assert_eq!(poller.apply_status(complete(3), t0), None);
    }

    #[test]
    fn startup_fetch_adopts_backend_state() {
        // Backend already finished a scan before this client connected.
        let mut poller = ScanPoller::default();
        let t0 = Instant::now();
        poller.mark_issued();
        assert_eq!(
            poller.apply_status(complete(42), t0),
            Some(ScanState::Complete)
        );
        assert!(!poller.poll_due(t0 + Duration::from_secs(5)));

        // Backend mid-scan from some other session: polling resumes.
        let mut poller = ScanPoller::default();
        poller.mark_issued();
        assert_eq!(poller.apply_status(scanning(7), t0), None);
        assert!(poller.is_scanning());
        assert!(poller.poll_due(t0 + DEFAULT_POLL_INTERVAL));
    }

    #[test]
    fn start_requires_idle_and_reset_reenables_it() {
        let mut poller = ScanPoller::default();
        let t0 = Instant::now();
        assert!(poller.start(t0));
        assert!(!poller.start(t0), "start is rejected mid-scan");

        poller.mark_issued();
        poller.apply_status(complete(1), t0);
        assert!(!poller.start(t0), "start is rejected until reset");

        assert!(poller.reset());
        assert_eq!(poller.state(), ScanState::Idle);
        assert!(poller.start(t0));
    }

    #[test]
    fn abort_start_rolls_back_to_idle() {
        let mut poller = ScanPoller::default();
        let t0 = Instant::now();
        poller.start(t0);
        poller.abort_start();
        assert_eq!(poller.state(), ScanState::Idle);
        assert!(!poller.poll_due(t0 + Duration::from_secs(1)));
        assert!(poller.start(t0), "start is available again");
    }
}
