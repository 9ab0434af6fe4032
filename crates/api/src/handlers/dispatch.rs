//! Handlers for the dispatch endpoints (PRD-18, PRD-21).
//!
//! Thin wrappers; the actual pipeline lives in [`crate::dispatch`].

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use outflow_core::types::DbId;

use crate::dispatch::report::{validation_report, ValidateQuery};
use crate::dispatch::send::{dispatch_campaign, SendRequest};
use crate::dispatch::test_send::{dispatch_test_send, TestSendRequest};
use crate::error::AppResult;
use crate::middleware::auth::ApiKeyAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/workspaces/{id}/dispatch
///
/// Run a real dispatch: gate the batch, create and activate the provider
/// campaign(s), record history. Irreversible once activation succeeds.
pub async fn send(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(workspace_id): Path<DbId>,
    Json(req): Json<SendRequest>,
) -> AppResult<impl IntoResponse> {
    let response = dispatch_campaign(&state, workspace_id, &req).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/workspaces/{id}/dispatch/test
///
/// Send the whole sequence to a single test inbox using the batch's first
/// lead as template. Never launches anything.
pub async fn test(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(workspace_id): Path<DbId>,
    Json(req): Json<TestSendRequest>,
) -> AppResult<impl IntoResponse> {
    let response = dispatch_test_send(&state, workspace_id, &req).await?;
    Ok(Json(DataResponse { data: response }))
}

/// GET /api/v1/workspaces/{id}/dispatch/validate?batch_id=1&campaign_id=2
///
/// Read-only per-step readiness report for a batch.
pub async fn validate(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(workspace_id): Path<DbId>,
    Query(query): Query<ValidateQuery>,
) -> AppResult<impl IntoResponse> {
    let report = validation_report(&state.pool, workspace_id, &query).await?;
    Ok(Json(DataResponse { data: report }))
}
