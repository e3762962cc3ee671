//! Owned request and response types for the API worker task.
//!
//! Everything here is fully owned (no borrowed lifetimes) so values can be
//! moved freely between the main loop and the worker over channels, and
//! stored in `AppState` once they arrive.

use duprev_core::error::ApiError;
use duprev_core::types::{
    DashboardStats, DeleteOutcome, DuplicateGroup, DuplicatesFilter, ScanStatus, UserInfo,
};

/// Commands sent from the main loop to the API worker task.
///
/// Sent over a `tokio::sync::mpsc::UnboundedSender<ApiRequest>` owned by the
/// main loop. The worker handles them strictly in arrival order.
#[derive(Debug, Clone)]
pub enum ApiRequest {
    /// Ask who is signed in. Doubles as the session probe at startup.
    CurrentUser,
    /// Fetch the identity-provider sign-in URL for the login screen.
    LoginUrl,
    Logout,
    StartScan,
    ScanStatus,
    ResetScan,
    /// Load duplicate groups narrowed by `filter`. `seq` is the review
    /// session's load token, echoed back verbatim so the session can
    /// discard responses a newer load has superseded.
    LoadDuplicates { seq: u64, filter: DuplicatesFilter },
    Stats,
    /// Delete the given file ids on the backend.
    DeleteFiles(Vec<String>),
}

/// One response from the API worker.
///
/// Carried inside `AppEvent::Api(Box<ApiOutcome>)`. Using `Box` keeps the
/// event variant small on the channel, since a duplicates listing can be
/// large. Every variant wraps a `Result` so the main loop decides how each
/// failure degrades; the worker never swallows one.
#[derive(Debug)]
pub enum ApiOutcome {
    CurrentUser(Result<UserInfo, ApiError>),
    LoginUrl(Result<String, ApiError>),
    Logout(Result<(), ApiError>),
    ScanStarted(Result<(), ApiError>),
    ScanStatus(Result<ScanStatus, ApiError>),
    ScanReset(Result<(), ApiError>),
    Duplicates {
        seq: u64,
        result: Result<Vec<DuplicateGroup>, ApiError>,
    },
    Stats(Result<DashboardStats, ApiError>),
    Deleted(Result<DeleteOutcome, ApiError>),
}
