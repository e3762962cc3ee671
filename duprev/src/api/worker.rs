//! Background task that owns the `ApiClient` for its lifetime.
//!
//! All communication is via channels: `ApiRequest` in, `AppEvent::Api` out.
//! Requests are handled one at a time in arrival order, which gives the rest
//! of the app two properties for free: scan-status polls can never overlap,
//! and a delete always settles before the reload queued behind it.

use duprev_core::client::ApiClient;
use duprev_core::error::ApiError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::api::types::{ApiOutcome, ApiRequest};
use crate::event::AppEvent;

/// Spawns the worker task. It runs until the request sender is dropped or
/// the event receiver goes away, whichever happens first.
pub fn spawn_api_worker(
    client: ApiClient,
    mut rx: UnboundedReceiver<ApiRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            debug!(?request, "api worker handling request");
            let outcome = handle_request(&client, request).await;
            if event_tx.send(AppEvent::Api(Box::new(outcome))).is_err() {
                break;
            }
        }
    });
}

/// Dispatches one request to the matching client call and wraps the answer.
async fn handle_request(client: &ApiClient, request: ApiRequest) -> ApiOutcome {
    match request {
        ApiRequest::CurrentUser => {
            ApiOutcome::CurrentUser(traced("current_user", client.current_user().await))
        }
        ApiRequest::LoginUrl => {
            ApiOutcome::LoginUrl(traced("login_url", client.login_url().await))
        }
        ApiRequest::Logout => ApiOutcome::Logout(traced("logout", client.logout().await)),
        ApiRequest::StartScan => {
            ApiOutcome::ScanStarted(traced("start_scan", client.start_scan().await))
        }
        ApiRequest::ScanStatus => {
            ApiOutcome::ScanStatus(traced("scan_status", client.scan_status().await))
        }
        ApiRequest::ResetScan => {
            ApiOutcome::ScanReset(traced("reset_scan", client.reset_scan().await))
        }
        ApiRequest::LoadDuplicates { seq, filter } => ApiOutcome::Duplicates {
            seq,
            result: traced("duplicates", client.duplicates(&filter).await),
        },
        ApiRequest::Stats => ApiOutcome::Stats(traced("stats", client.stats().await)),
        ApiRequest::DeleteFiles(ids) => {
            ApiOutcome::Deleted(traced("delete_files", client.delete_files(&ids).await))
        }
    }
}

/// Logs a failed call before handing the result back unchanged. The main
/// loop owns the user-facing handling; this is just the paper trail.
fn traced<T>(op: &'static str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(e) = &result {
        warn!(op, error = %e, "api request failed");
    }
    result
}
