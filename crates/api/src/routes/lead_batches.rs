//! Route definitions for the `/lead-batches` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::lead_batches;
use crate::state::AppState;

/// Routes mounted at `/lead-batches`.
///
/// ```text
/// GET    /{id}/leads      -> list_leads
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/leads", get(lead_batches::list_leads))
}
