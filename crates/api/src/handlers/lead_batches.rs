//! Handlers for lead batches and their leads (PRD-9).
//!
//! Read-only: batches and leads are written by the import and
//! personalization tooling, not through this API.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use outflow_core::error::CoreError;
use outflow_core::types::DbId;
use outflow_db::models::lead::LeadListQuery;
use outflow_db::repositories::{LeadBatchRepo, LeadRepo, WorkspaceRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ApiKeyAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/workspaces/{id}/lead-batches
pub async fn list(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(workspace_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    WorkspaceRepo::find_by_id(&state.pool, workspace_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "workspace",
            id: workspace_id,
        }))?;

    let batches = LeadBatchRepo::list_by_workspace(&state.pool, workspace_id).await?;
    Ok(Json(DataResponse { data: batches }))
}

/// GET /api/v1/lead-batches/{id}/leads?limit=100&offset=0
///
/// Leads in insertion order, paginated.
pub async fn list_leads(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(batch_id): Path<DbId>,
    Query(query): Query<LeadListQuery>,
) -> AppResult<impl IntoResponse> {
    LeadBatchRepo::find_by_id(&state.pool, batch_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "lead_batch",
            id: batch_id,
        }))?;

    let leads = LeadRepo::list_by_batch(&state.pool, batch_id, &query).await?;
    Ok(Json(DataResponse { data: leads }))
}
