pub mod campaigns;
pub mod health;
pub mod lead_batches;
pub mod workspaces;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /workspaces                                      create (POST)
/// /workspaces/{id}                                 get, update (PATCH)
/// /workspaces/{id}/playbook                        get, merge-save (PUT)
/// /workspaces/{id}/lead-batches                    list batches
/// /workspaces/{id}/campaigns                       list, create
/// /workspaces/{id}/sent-campaigns                  dispatch history
/// /workspaces/{id}/dispatch                        real send (POST)
/// /workspaces/{id}/dispatch/test                   test send (POST)
/// /workspaces/{id}/dispatch/validate               readiness report (GET)
///
/// /campaigns/{id}                                  get, update (PATCH)
///
/// /lead-batches/{id}/leads                         list leads (paginated)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/workspaces", workspaces::router())
        .nest("/campaigns", campaigns::router())
        .nest("/lead-batches", lead_batches::router())
}
