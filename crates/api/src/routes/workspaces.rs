//! Route definitions for the `/workspaces` resource and everything scoped
//! under one workspace.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{campaigns, dispatch, lead_batches, sent_campaigns, workspaces};
use crate::state::AppState;

/// Routes mounted at `/workspaces`.
///
/// ```text
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PATCH  /{id}                    -> update
/// GET    /{id}/playbook           -> get_playbook
/// PUT    /{id}/playbook           -> save_playbook
/// GET    /{id}/lead-batches       -> lead_batches::list
/// GET    /{id}/campaigns          -> campaigns::list
/// POST   /{id}/campaigns          -> campaigns::create
/// GET    /{id}/sent-campaigns     -> sent_campaigns::list
/// POST   /{id}/dispatch           -> dispatch::send
/// POST   /{id}/dispatch/test      -> dispatch::test
/// GET    /{id}/dispatch/validate  -> dispatch::validate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(workspaces::create))
        .route(
            "/{id}",
            get(workspaces::get_by_id).patch(workspaces::update),
        )
        .route(
            "/{id}/playbook",
            get(workspaces::get_playbook).put(workspaces::save_playbook),
        )
        .route("/{id}/lead-batches", get(lead_batches::list))
        .route(
            "/{id}/campaigns",
            get(campaigns::list).post(campaigns::create),
        )
        .route("/{id}/sent-campaigns", get(sent_campaigns::list))
        .route("/{id}/dispatch", post(dispatch::send))
        .route("/{id}/dispatch/test", post(dispatch::test))
        .route("/{id}/dispatch/validate", get(dispatch::validate))
}
