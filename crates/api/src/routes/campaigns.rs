//! Route definitions for the `/campaigns` resource.
//!
//! Creation and listing live under the owning workspace; only id-addressed
//! operations mount here.

use axum::routing::get;
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /{id}            -> get_by_id
/// PATCH  /{id}            -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(campaigns::get_by_id).patch(campaigns::update))
}
