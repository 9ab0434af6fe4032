//! Handler for the dispatch history (PRD-18).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use outflow_core::error::CoreError;
use outflow_core::types::DbId;
use outflow_db::repositories::{SentCampaignRepo, WorkspaceRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ApiKeyAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/workspaces/{id}/sent-campaigns
///
/// Every provider campaign this workspace has actually dispatched, newest
/// first, including test sends and both halves of each A/B pair.
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

    let history = SentCampaignRepo::list_by_workspace(&state.pool, workspace_id).await?;
    Ok(Json(DataResponse { data: history }))
}
