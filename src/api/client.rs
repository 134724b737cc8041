//! HTTP client for the auth service refresh endpoint.
//!
//! The refresh endpoint is the only network surface of this library.
//! Django's token view reports an expired refresh token as a JSON body
//! with a `detail` field (on a 401), so the response body is parsed as
//! JSON regardless of HTTP status.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiError;
use crate::config;

/// Path of the token refresh endpoint, relative to the backend origin
const REFRESH_PATH: &str = "/api/token/refresh";

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Body of a refresh response.
///
/// Exactly one of the fields is present on the interesting paths: a
/// new `access` token on success, a `detail` message when the refresh
/// token is no longer honored. Anything else parses to two `None`s and
/// is the caller's "rejected" case.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Client for the auth service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: Option<String>,
}

impl AuthClient {
    /// Create a client that resolves the backend origin from the
    /// environment on every call.
    ///
    /// No request timeout is configured: the transport default applies,
    /// and retry policy belongs to the caller that triggered the
    /// refresh.
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: None,
        })
    }

    /// Create a client pinned to a fixed backend origin.
    ///
    /// Used by tests to point at a mock server; production callers
    /// normally rely on `BACKEND_URL`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: Some(base_url.into()),
        })
    }

    fn resolve_base_url(&self) -> Result<String, ApiError> {
        match &self.base_url {
            Some(url) => Ok(url.trim_end_matches('/').to_string()),
            None => config::backend_url().map_err(|e| ApiError::Configuration(e.to_string())),
        }
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Issues exactly one `POST {base}/api/token/refresh` with a JSON
    /// body of `{"refresh": "<token>"}` and parses whatever comes back
    /// as JSON. A non-JSON body or a connection failure is an error;
    /// interpreting the parsed body is the session layer's job.
    pub async fn refresh_token(&self, refresh: &str) -> Result<RefreshResponse, ApiError> {
        let base = self.resolve_base_url()?;
        let url = format!("{}{}", base, REFRESH_PATH);

        debug!(url = %url, "Requesting access token refresh");

        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = %status, "Refresh response received");

        serde_json::from_str(&text).map_err(|_| {
            ApiError::InvalidResponse(format!(
                "Status {}: {}",
                status,
                ApiError::truncate_body(&text)
            ))
        })
    }
}
