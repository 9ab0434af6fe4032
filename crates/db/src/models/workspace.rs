//! Workspace entity model and DTOs (PRD-3).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use outflow_core::types::{DbId, Timestamp};

/// A row from the `workspaces` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workspace {
    pub id: DbId,
    pub name: String,
    /// Instantly API key for this workspace. Never serialized to clients.
    #[serde(skip_serializing)]
    pub instantly_api_key: Option<String>,
    /// Workspace-default playbook document (opaque JSON).
    pub playbook_json: Option<serde_json::Value>,
    pub icp: Option<String>,
    pub proof_points_json: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /api/v1/workspaces`.
#[derive(Debug, Deserialize)]
pub struct CreateWorkspace {
    pub name: String,
    pub instantly_api_key: Option<String>,
    pub icp: Option<String>,
    pub proof_points_json: Option<serde_json::Value>,
}

/// DTO for `PATCH /api/v1/workspaces/{id}`. All fields optional; absent
/// fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkspace {
    pub name: Option<String>,
    pub instantly_api_key: Option<String>,
    pub icp: Option<String>,
    pub proof_points_json: Option<serde_json::Value>,
}
