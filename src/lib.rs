//! feedguard - client-side session and content-safety layer for a
//! social feed.
//!
//! Two independent, stateless-per-call components:
//!
//! - [`CredentialManager`]: decides locally whether the stored access
//!   token is still usable, exchanges the refresh token for a new one
//!   when it is not, and clears credentials on logout or when the
//!   session is unrecoverable.
//! - [`sanitize_html`]: reduces arbitrary user-authored HTML to a
//!   safe-to-render subset before display.
//!
//! The credential store is injected (see [`store::CredentialStore`]),
//! so route guards, request interceptors, and tests all work against
//! the same interface. Typical control flow for a protected call:
//! ask `is_access_valid()`; if false, `refresh().await`; if the
//! outcome is anything but [`RefreshOutcome::Refreshed`] or a
//! transient failure, `clear()` and route to the unauthenticated
//! state.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod sanitize;
pub mod store;

pub use auth::{CredentialManager, RefreshOutcome};
pub use sanitize::sanitize_html;
pub use store::{CredentialStore, FileStore, MemoryStore};
