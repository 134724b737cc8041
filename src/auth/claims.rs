//! Unverified JWT payload decoding.
//!
//! Validity checks only need the `exp` claim, so the payload segment is
//! base64-decoded and parsed without verifying the signature. This is a
//! deliberate layering choice: the client check avoids a network round
//! trip, and the server still verifies signatures on every real request.

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

/// Claims this library consults. Everything else in the payload is
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Expiry timestamp in Unix seconds. Absent in tokens that never
    /// expire.
    pub exp: Option<i64>,
}

impl Claims {
    /// Whether the token expired strictly before `now` (Unix seconds).
    ///
    /// A missing `exp` claim never counts as expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        matches!(self.exp, Some(exp) if exp < now)
    }
}

/// Decode the claims of a JWT without verifying its signature.
///
/// Fails on anything that is not a three-segment token with a
/// base64url-encoded JSON payload.
pub fn decode(token: &str) -> Result<Claims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        anyhow::bail!("Token does not have three segments");
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1])
        .context("Token payload is not valid base64url")?;

    serde_json::from_slice(&payload).context("Token payload is not valid JSON")
}
