//! Session credential manager.
//!
//! Answers "can I act as an authenticated user right now?" without a
//! network call, and upgrades the session via the refresh endpoint when
//! the answer is no but recoverable.

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, warn};

use crate::api::{AuthClient, RefreshResponse};
use crate::auth::claims;
use crate::store::{CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SALT_KEY};

/// `detail` value the auth service returns when the refresh token is no
/// longer honored.
const TOKEN_INVALID_OR_EXPIRED: &str = "Token is invalid or expired";

/// Result of a refresh attempt.
///
/// Only `Expired` mutates stored state (both tokens are removed);
/// `Rejected` and `TransportError` are transient and leave the stored
/// refresh token intact so a later attempt can still succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new access token was obtained and written to the store.
    Refreshed,
    /// No refresh token is stored: the session is simply logged out.
    NoToken,
    /// The server no longer honors the refresh token; local credentials
    /// were cleared. The user must re-authenticate.
    Expired,
    /// The server answered with neither a token nor an expiry signal.
    Rejected,
    /// The request itself failed (connection error, non-JSON body).
    /// Safe to retry later.
    TransportError,
}

/// Manages the credential pair held in the injected store.
///
/// Stateless per call: every operation re-reads the store, so several
/// managers over the same store observe each other's writes. Concurrent
/// `refresh()` calls are NOT deduplicated - each proceeds independently
/// and the last write to the access-token key wins, matching the
/// behavior of the interceptor-driven flow this replaces.
pub struct CredentialManager<S: CredentialStore> {
    store: S,
    client: AuthClient,
}

impl<S: CredentialStore> CredentialManager<S> {
    /// Create a manager over `store`, resolving the auth service origin
    /// from the environment on each refresh.
    pub fn new(store: S) -> Result<Self> {
        Ok(Self {
            store,
            client: AuthClient::new()?,
        })
    }

    /// Create a manager with an explicit client (tests pin the client
    /// to a mock server origin).
    pub fn with_client(store: S, client: AuthClient) -> Self {
        Self { store, client }
    }

    /// Check whether the stored access token is usable right now.
    ///
    /// Purely local: decodes the token's `exp` claim without verifying
    /// the signature and compares it against the current time in Unix
    /// seconds. A missing token is `false`; a malformed or expired
    /// token clears all credentials (a corrupt token can never become
    /// valid) and is `false`. A token without an `exp` claim counts as
    /// valid.
    ///
    /// Errors only surface when the store itself is unavailable.
    pub fn is_access_valid(&self) -> Result<bool> {
        let Some(token) = self.store.get(ACCESS_TOKEN_KEY)? else {
            return Ok(false);
        };

        let claims = match claims::decode(&token) {
            Ok(claims) => claims,
            Err(err) => {
                warn!(error = %err, "Stored access token is malformed, clearing credentials");
                self.clear()?;
                return Ok(false);
            }
        };

        if claims.is_expired_at(Utc::now().timestamp()) {
            debug!("Access token expired, clearing credentials");
            self.clear()?;
            return Ok(false);
        }

        Ok(true)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Issues at most one network request and never retries; retry
    /// policy belongs to the caller. The store is only mutated on the
    /// `Refreshed` (access token overwritten) and `Expired` (both
    /// tokens removed) outcomes, and the write completes before the
    /// outcome is returned.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let Some(refresh) = self.store.get(REFRESH_TOKEN_KEY)? else {
            debug!("No refresh token stored, session is logged out");
            return Ok(RefreshOutcome::NoToken);
        };

        match self.client.refresh_token(&refresh).await {
            Ok(response) => self.apply_refresh_response(response),
            Err(err) if err.is_transient() => {
                // Logged for diagnostics, surfaced as a soft outcome:
                // nothing local changed, the next protected request can
                // try again.
                warn!(error = %err, "Token refresh request failed");
                Ok(RefreshOutcome::TransportError)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn apply_refresh_response(&self, response: RefreshResponse) -> Result<RefreshOutcome> {
        if response.detail.as_deref() == Some(TOKEN_INVALID_OR_EXPIRED) {
            debug!("Refresh token no longer honored, clearing tokens");
            self.store.remove(REFRESH_TOKEN_KEY)?;
            self.store.remove(ACCESS_TOKEN_KEY)?;
            return Ok(RefreshOutcome::Expired);
        }

        if let Some(access) = response.access {
            self.store.set(ACCESS_TOKEN_KEY, &access)?;
            debug!("Access token refreshed");
            return Ok(RefreshOutcome::Refreshed);
        }

        // Parsed fine but carried neither signal: leave the refresh
        // token alone and let the caller prompt for re-authentication.
        debug!("Refresh response carried neither access token nor expiry signal");
        Ok(RefreshOutcome::Rejected)
    }

    /// Remove all credentials (logout).
    ///
    /// Removes the access token, the refresh token, and the auxiliary
    /// salt. Idempotent: clearing an already-empty store is a no-op.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        self.store.remove(SALT_KEY)?;
        Ok(())
    }

    /// Read the stored access token, for the request layer that
    /// attaches it as a bearer credential.
    pub fn access_token(&self) -> Result<Option<String>> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    fn jwt_with_exp(exp: Option<i64>) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = match exp {
            Some(exp) => serde_json::json!({"exp": exp, "user_id": 1}),
            None => serde_json::json!({"user_id": 1}),
        };
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{}.{}.sig", header, body)
    }

    fn manager() -> CredentialManager<MemoryStore> {
        let client = AuthClient::with_base_url("http://localhost:9").unwrap();
        CredentialManager::with_client(MemoryStore::new(), client)
    }

    #[test]
    fn test_is_access_valid_no_token() {
        let manager = manager();
        assert!(!manager.is_access_valid().unwrap());
    }

    #[test]
    fn test_is_access_valid_future_exp_leaves_store_alone() {
        let manager = manager();
        let token = jwt_with_exp(Some(Utc::now().timestamp() + 3600));
        manager.store().set(ACCESS_TOKEN_KEY, &token).unwrap();
        manager.store().set(REFRESH_TOKEN_KEY, "r-1").unwrap();

        assert!(manager.is_access_valid().unwrap());
        assert_eq!(
            manager.store().get(ACCESS_TOKEN_KEY).unwrap(),
            Some(token)
        );
        assert_eq!(
            manager.store().get(REFRESH_TOKEN_KEY).unwrap(),
            Some("r-1".to_string())
        );
    }

    #[test]
    fn test_is_access_valid_expired_clears_credentials() {
        let manager = manager();
        let token = jwt_with_exp(Some(Utc::now().timestamp() - 3600));
        manager.store().set(ACCESS_TOKEN_KEY, &token).unwrap();
        manager.store().set(REFRESH_TOKEN_KEY, "r-1").unwrap();
        manager.store().set(SALT_KEY, "s-1").unwrap();

        assert!(!manager.is_access_valid().unwrap());
        assert_eq!(manager.store().get(ACCESS_TOKEN_KEY).unwrap(), None);
        assert_eq!(manager.store().get(REFRESH_TOKEN_KEY).unwrap(), None);
        assert_eq!(manager.store().get(SALT_KEY).unwrap(), None);
    }

    #[test]
    fn test_is_access_valid_malformed_token_clears_credentials() {
        let manager = manager();
        manager
            .store()
            .set(ACCESS_TOKEN_KEY, "definitely-not-a-jwt")
            .unwrap();
        manager.store().set(REFRESH_TOKEN_KEY, "r-1").unwrap();

        assert!(!manager.is_access_valid().unwrap());
        assert_eq!(manager.store().get(ACCESS_TOKEN_KEY).unwrap(), None);
        assert_eq!(manager.store().get(REFRESH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_is_access_valid_missing_exp_is_valid() {
        let manager = manager();
        let token = jwt_with_exp(None);
        manager.store().set(ACCESS_TOKEN_KEY, &token).unwrap();

        assert!(manager.is_access_valid().unwrap());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let manager = manager();
        manager.store().set(ACCESS_TOKEN_KEY, "a").unwrap();
        manager.store().set(REFRESH_TOKEN_KEY, "r").unwrap();
        manager.store().set(SALT_KEY, "s").unwrap();

        manager.clear().unwrap();
        assert_eq!(manager.store().get(ACCESS_TOKEN_KEY).unwrap(), None);

        // Second clear over an empty store must not error.
        manager.clear().unwrap();
    }

    #[test]
    fn test_apply_refresh_response_rejected_keeps_refresh_token() {
        let manager = manager();
        manager.store().set(REFRESH_TOKEN_KEY, "r-1").unwrap();

        let outcome = manager
            .apply_refresh_response(RefreshResponse {
                access: None,
                detail: Some("Please log in again".to_string()),
            })
            .unwrap();

        assert_eq!(outcome, RefreshOutcome::Rejected);
        assert_eq!(
            manager.store().get(REFRESH_TOKEN_KEY).unwrap(),
            Some("r-1".to_string())
        );
    }

    #[test]
    fn test_access_token_read() {
        let manager = manager();
        assert_eq!(manager.access_token().unwrap(), None);
        manager.store().set(ACCESS_TOKEN_KEY, "a-1").unwrap();
        assert_eq!(manager.access_token().unwrap(), Some("a-1".to_string()));
    }

    #[tokio::test]
    async fn test_refresh_without_token_returns_no_token() {
        // No server is running on this origin; NoToken must be decided
        // before any request is attempted.
        let manager = manager();
        let outcome = manager.refresh().await.unwrap();
        assert_eq!(outcome, RefreshOutcome::NoToken);
    }
}
