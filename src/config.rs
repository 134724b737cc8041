//! Backend configuration.
//!
//! The auth service origin comes from the `BACKEND_URL` environment
//! variable. It is read on every call rather than cached so a process
//! that reconfigures its environment (tests, embedders) is always
//! talking to the right origin.

use anyhow::{Context, Result};

/// Environment variable naming the auth service origin,
/// e.g. `https://social.example.org`.
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Resolve the backend base URL from the environment.
///
/// A trailing slash is tolerated and stripped so callers can join
/// paths with a plain `format!`.
pub fn backend_url() -> Result<String> {
    let url = std::env::var(BACKEND_URL_ENV)
        .with_context(|| format!("{} is not set", BACKEND_URL_ENV))?;
    let url = url.trim_end_matches('/').to_string();
    if url.is_empty() {
        anyhow::bail!("{} is empty", BACKEND_URL_ENV);
    }
    Ok(url)
}
