//! Repository for the `campaigns` table (PRD-18).

use sqlx::PgPool;

use outflow_core::campaign::STATUS_LAUNCHED;
use outflow_core::types::DbId;

use crate::models::campaign::{Campaign, CreateCampaign, UpdateCampaign};

/// Column list for `campaigns` queries.
const COLUMNS: &str = "\
    id, workspace_id, name, status, playbook_json, icp, proof_points_json, \
    lead_batch_id, created_at, updated_at";

/// Provides CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Create a campaign, copying the workspace's playbook, ICP, and proof
    /// points as its starting configuration.
    ///
    /// Returns `RowNotFound` when the workspace does not exist.
    pub async fn create(
        pool: &PgPool,
        workspace_id: DbId,
        input: &CreateCampaign,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns \
                 (workspace_id, name, lead_batch_id, playbook_json, icp, proof_points_json) \
             SELECT w.id, $2, $3, w.playbook_json, w.icp, w.proof_points_json \
             FROM workspaces w WHERE w.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(input.lead_batch_id)
            .fetch_one(pool)
            .await
    }

    /// Find a campaign by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a workspace's campaigns, newest first.
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns \
             WHERE workspace_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Status transition rules are enforced by the
    /// caller, not here.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET \
                 name = COALESCE($2, name), \
                 status = COALESCE($3, status), \
                 playbook_json = COALESCE($4, playbook_json), \
                 icp = COALESCE($5, icp), \
                 proof_points_json = COALESCE($6, proof_points_json), \
                 lead_batch_id = COALESCE($7, lead_batch_id) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.status)
            .bind(&input.playbook_json)
            .bind(&input.icp)
            .bind(&input.proof_points_json)
            .bind(input.lead_batch_id)
            .fetch_optional(pool)
            .await
    }

    /// Record a successful real dispatch: status becomes launched and the
    /// name is overwritten with the name actually sent under.
    pub async fn mark_launched(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET status = $2, name = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(STATUS_LAUNCHED)
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
