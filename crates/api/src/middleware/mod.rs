//! Authentication middleware extractors.
//!
//! - [`auth::ApiKeyAuth`] -- Requires the configured API key as a Bearer token.

pub mod auth;
