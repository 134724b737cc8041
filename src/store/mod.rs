//! Credential store ("cookie jar") abstraction.
//!
//! This module provides:
//! - `CredentialStore`: the key-value interface the session layer reads
//!   and writes credentials through
//! - `FileStore`: JSON-file-backed store persisted across runs
//! - `MemoryStore`: in-memory store for tests and short-lived embedders
//!
//! The store is injected into `CredentialManager` rather than acquired
//! as a process-wide singleton, so callers can substitute test doubles.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use anyhow::Result;

/// Key under which the short-lived access token is stored.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key under which the long-lived refresh token is stored.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Auxiliary key cleared alongside the tokens on logout. The session
/// layer never reads or writes it outside of `clear()`.
pub const SALT_KEY: &str = "salt";

/// Key-value interface over the session-scoped credential store.
///
/// Mirrors a browser cookie jar: `get` returns `None` for absent keys,
/// `remove` of an absent key is a no-op. Errors are reserved for the
/// storage medium itself being unavailable.
pub trait CredentialStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any existing value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` from the store. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}
