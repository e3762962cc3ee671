use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::types::{
    DashboardStats, DeleteOutcome, DuplicateGroup, DuplicatesFilter, ScanStatus, UserInfo,
};

/// Typed client for the dedup backend, one method per endpoint.
///
/// Authentication is cookie-based: the backend sets a session cookie during
/// the OAuth callback and every call here sends it back automatically via
/// the client's cookie store. Redirects are not followed, because
/// `/auth/login` answers with a redirect to the identity provider and we
/// want that URL as data, not to chase it.
///
/// Methods return `ApiError::Unauthenticated` on 401 so callers can route
/// back to the sign-in screen without string-matching status codes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    /// Builds a client for the given base URL, e.g. `http://127.0.0.1:8000`.
    /// A trailing slash is tolerated and stripped.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|e| ApiError::BadBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::BadBaseUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }
        let http = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .user_agent(concat!("duprev/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ApiClient {
            http,
            base: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Fetches the provider sign-in URL without following it.
    ///
    /// The backend answers either with a redirect to the provider or with a
    /// small JSON body naming the same URL; both shapes are accepted.
    pub async fn login_url(&self) -> Result<String, ApiError> {
        let resp = self.http.get(self.url("/auth/login")).send().await?;
        if resp.status().is_redirection() {
            return resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .ok_or_else(|| ApiError::Decode("redirect without a Location header".into()));
        }
        #[derive(Deserialize)]
        struct LoginRedirect {
            auth_url: String,
        }
        let body: LoginRedirect = decode(check(resp).await?).await?;
        Ok(body.auth_url)
    }

    /// Returns the signed-in account, or `Unauthenticated` when the session
    /// cookie is missing or expired.
    pub async fn current_user(&self) -> Result<UserInfo, ApiError> {
        self.get_json("/auth/me").await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post_ok("/auth/logout").await
    }

    /// Kicks off a backend scan. Fails with a 409 (`is_conflict`) when a
    /// scan is already running.
    pub async fn start_scan(&self) -> Result<(), ApiError> {
        self.post_ok("/api/scan/start").await
    }

    pub async fn scan_status(&self) -> Result<ScanStatus, ApiError> {
        self.get_json("/api/scan/status").await
    }

    /// Clears backend scan state so a fresh scan can start.
    pub async fn reset_scan(&self) -> Result<(), ApiError> {
        self.post_ok("/api/scan/reset").await
    }

    /// Lists duplicate groups, narrowed by `filter`. The backend returns
    /// groups sorted by reclaimable size descending.
    pub async fn duplicates(
        &self,
        filter: &DuplicatesFilter,
    ) -> Result<Vec<DuplicateGroup>, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/duplicates"))
            .query(&filter.query_pairs())
            .send()
            .await?;
        decode(check(resp).await?).await
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("/api/stats").await
    }

    /// Asks the backend to move the given files to its recycle facility.
    /// Partial failure comes back inside a 2xx `DeleteOutcome`; deleting
    /// every copy of a group is rejected outright with a 400.
    pub async fn delete_files(&self, file_ids: &[String]) -> Result<DeleteOutcome, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/delete"))
            .json(&json!({ "file_ids": file_ids }))
            .send()
            .await?;
        decode(check(resp).await?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.http.get(self.url(path)).send().await?;
        decode(check(resp).await?).await
    }

    async fn post_ok(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.http.post(self.url(path)).send().await?;
        check(resp).await?;
        Ok(())
    }
}

/// Maps 401 to `Unauthenticated` and any other non-2xx to `RequestFailed`
/// with the response text attached.
async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthenticated);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::RequestFailed {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped_from_base() {
        let client = ApiClient::new("http://127.0.0.1:8000/").expect("valid base url");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn base_url_without_scheme_is_rejected() {
        assert!(matches!(
            ApiClient::new("127.0.0.1:8000"),
            Err(ApiError::BadBaseUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("not a url at all"),
            Err(ApiError::BadBaseUrl(_))
        ));
    }
}
