use thiserror::Error;

/// Failure classes surfaced by [`crate::client::ApiClient`].
///
/// Callers mostly care about one distinction: `Unauthenticated` means the
/// session cookie is gone and the user must sign in again; everything else
/// degrades to a retryable message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL could not be parsed.
    #[error("invalid base url `{0}`")]
    BadBaseUrl(String),

    /// The backend rejected the session cookie (HTTP 401).
    #[error("not signed in")]
    Unauthenticated,

    /// Any non-2xx response other than 401. `body` is the raw response
    /// text, which the backend uses for human-readable detail.
    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The request never completed: connection refused, DNS, timeout.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
    }

    /// True for a 409, the status the backend uses when a scan is already
    /// running.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::RequestFailed { status: 409, .. })
    }
}
