//! Handlers for the `/campaigns` resource (PRD-18).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use outflow_core::campaign::{validate_campaign_name, validate_transition};
use outflow_core::error::CoreError;
use outflow_core::types::DbId;
use outflow_db::models::campaign::{CreateCampaign, UpdateCampaign};
use outflow_db::repositories::{CampaignRepo, LeadBatchRepo, WorkspaceRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ApiKeyAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A campaign may only reference a batch inside its own workspace.
async fn ensure_batch_in_workspace(
    state: &AppState,
    workspace_id: DbId,
    batch_id: DbId,
) -> AppResult<()> {
    LeadBatchRepo::find_by_id(&state.pool, batch_id)
        .await?
        .filter(|batch| batch.workspace_id == workspace_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "lead_batch",
            id: batch_id,
        }))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/workspaces/{id}/campaigns
///
/// Creates a draft campaign, copying the workspace's playbook, ICP, and
/// proof points as its starting configuration.
pub async fn create(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(workspace_id): Path<DbId>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<impl IntoResponse> {
    validate_campaign_name(&input.name)?;
    if let Some(batch_id) = input.lead_batch_id {
        ensure_batch_in_workspace(&state, workspace_id, batch_id).await?;
    }

    let campaign = CampaignRepo::create(&state.pool, workspace_id, &input).await?;
    tracing::info!(campaign_id = campaign.id, workspace_id, "campaign created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/workspaces/{id}/campaigns
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

    let campaigns = CampaignRepo::list_by_workspace(&state.pool, workspace_id).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "campaign",
            id,
        }))?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PATCH /api/v1/campaigns/{id}
///
/// Partial update. Status may move between `draft` and `sequences_ready`
/// only; `launched` is set exclusively by a successful dispatch and is
/// terminal.
pub async fn update(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<impl IntoResponse> {
    let existing = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "campaign",
            id,
        }))?;

    if let Some(name) = &input.name {
        validate_campaign_name(name)?;
    }
    if let Some(status) = &input.status {
        validate_transition(&existing.status, status)?;
    }
    if let Some(batch_id) = input.lead_batch_id {
        ensure_batch_in_workspace(&state, existing.workspace_id, batch_id).await?;
    }

    let campaign = CampaignRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "campaign",
            id,
        }))?;
    Ok(Json(DataResponse { data: campaign }))
}
