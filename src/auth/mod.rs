//! Session credential lifecycle.
//!
//! This module provides:
//! - `CredentialManager`: local access-token validity checks, refresh
//!   via the auth service, and logout-time clearing
//! - `claims`: unverified JWT payload decoding for the local expiry
//!   check
//!
//! The local check is advisory only - the server remains authoritative
//! and will reject a forged token on the first real API call.

pub mod claims;
pub mod manager;

pub use claims::Claims;
pub use manager::{CredentialManager, RefreshOutcome};
