//! HTTP client module for the auth service.
//!
//! This module provides the `AuthClient` for the single network call
//! this library makes: exchanging a refresh token for a new access
//! token at `POST {base}/api/token/refresh`.

pub mod client;
pub mod error;

pub use client::{AuthClient, RefreshResponse};
pub use error::ApiError;
