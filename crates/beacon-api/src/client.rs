//! Presence fetcher: one GET per call, status codes passed through.

use beacon_common::ApiError;
use tracing::debug;

/// Path appended to the configured base URL.
pub const PRESENCE_PATH: &str = "/presence";

const USER_AGENT: &str = concat!("beacon/", env!("CARGO_PKG_VERSION"));

/// Full presence URL for `base`.
pub fn presence_url(base: &str) -> String {
    format!("{}{PRESENCE_PATH}", base.trim_end_matches('/'))
}

/// HTTP client bound to a single presence endpoint.
pub struct PresenceApi {
    url: String,
    http: reqwest::Client,
}

impl PresenceApi {
    pub fn new(base: &str) -> Self {
        Self::with_client(base, reqwest::Client::new())
    }

    pub fn with_client(base: &str, http: reqwest::Client) -> Self {
        Self {
            url: presence_url(base),
            http,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the GET request.
    ///
    /// Any HTTP reply is returned as-is, whatever its status; only a
    /// request that could not complete is an error.
    pub async fn fetch(&self) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http
            .get(&self.url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(url = %self.url, status = %response.status(), "Presence API response");
        Ok(response)
    }
}
