//! Handlers for the `/workspaces` resource (PRD-3, PRD-7).
//!
//! Workspace CRUD plus the playbook document endpoints. Playbook saves
//! merge top-level keys into the stored document so the strategy form and
//! the step editor can save independently without clobbering each other.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use outflow_core::error::CoreError;
use outflow_core::types::DbId;
use outflow_db::models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace};
use outflow_db::repositories::WorkspaceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ApiKeyAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "workspace name must not be blank".to_string(),
        )));
    }
    Ok(())
}

async fn find_workspace(state: &AppState, id: DbId) -> AppResult<Workspace> {
    WorkspaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "workspace",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Workspace CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/workspaces
pub async fn create(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Json(input): Json<CreateWorkspace>,
) -> AppResult<impl IntoResponse> {
    require_name(&input.name)?;

    let workspace = WorkspaceRepo::create(&state.pool, &input).await?;
    tracing::info!(workspace_id = workspace.id, "workspace created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: workspace })))
}

/// GET /api/v1/workspaces/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let workspace = find_workspace(&state, id).await?;
    Ok(Json(DataResponse { data: workspace }))
}

/// PATCH /api/v1/workspaces/{id}
///
/// Partial update; absent fields are left untouched.
pub async fn update(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkspace>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_name(name)?;
    }

    let workspace = WorkspaceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "workspace",
            id,
        }))?;
    Ok(Json(DataResponse { data: workspace }))
}

// ---------------------------------------------------------------------------
// Playbook document
// ---------------------------------------------------------------------------

/// GET /api/v1/workspaces/{id}/playbook
///
/// Returns the stored playbook document, or JSON null when none is set.
pub async fn get_playbook(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let workspace = find_workspace(&state, id).await?;
    Ok(Json(DataResponse {
        data: workspace.playbook_json.unwrap_or(serde_json::Value::Null),
    }))
}

/// PUT /api/v1/workspaces/{id}/playbook
///
/// Merge the submitted object's top-level keys into the stored document.
/// `guidelines` or `steps` submitted here replace the old value under that
/// key wholesale; keys not submitted survive.
pub async fn save_playbook(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(id): Path<DbId>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let Some(incoming) = body.as_object() else {
        return Err(AppError::Core(CoreError::Validation(
            "playbook document must be a JSON object".to_string(),
        )));
    };

    let workspace = find_workspace(&state, id).await?;

    // A stored non-object document is legacy garbage; start fresh.
    let mut merged = workspace
        .playbook_json
        .as_ref()
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();
    for (key, value) in incoming {
        merged.insert(key.clone(), value.clone());
    }

    let document = serde_json::Value::Object(merged);
    let workspace = WorkspaceRepo::set_playbook(&state.pool, id, &document)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "workspace",
            id,
        }))?;

    tracing::info!(workspace_id = id, "playbook saved");
    Ok(Json(DataResponse {
        data: workspace.playbook_json.unwrap_or(serde_json::Value::Null),
    }))
}
