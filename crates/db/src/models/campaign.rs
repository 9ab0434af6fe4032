//! Campaign entity model and DTOs (PRD-18).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use outflow_core::types::{DbId, Timestamp};

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub workspace_id: DbId,
    pub name: String,
    /// One of the `outflow_core::campaign` status constants.
    pub status: String,
    /// Campaign-local playbook override, copied from the workspace at
    /// creation and edited independently afterwards.
    pub playbook_json: Option<serde_json::Value>,
    pub icp: Option<String>,
    pub proof_points_json: Option<serde_json::Value>,
    pub lead_batch_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /api/v1/workspaces/{id}/campaigns`. The playbook, ICP, and
/// proof points are not accepted here; they are copied from the workspace.
#[derive(Debug, Deserialize)]
pub struct CreateCampaign {
    pub name: String,
    pub lead_batch_id: Option<DbId>,
}

/// DTO for `PATCH /api/v1/campaigns/{id}`. All fields optional; absent
/// fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub status: Option<String>,
    pub playbook_json: Option<serde_json::Value>,
    pub icp: Option<String>,
    pub proof_points_json: Option<serde_json::Value>,
    pub lead_batch_id: Option<DbId>,
}
