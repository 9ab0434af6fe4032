//! Repository for the `workspaces` table (PRD-3).

use sqlx::PgPool;

use outflow_core::types::DbId;

use crate::models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace};

/// Column list for `workspaces` queries.
const COLUMNS: &str = "\
    id, name, instantly_api_key, playbook_json, icp, proof_points_json, \
    created_at, updated_at";

/// Provides CRUD operations for workspaces.
pub struct WorkspaceRepo;

impl WorkspaceRepo {
    /// Create a new workspace.
    pub async fn create(pool: &PgPool, input: &CreateWorkspace) -> Result<Workspace, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspaces (name, instantly_api_key, icp, proof_points_json) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(&input.name)
            .bind(&input.instantly_api_key)
            .bind(&input.icp)
            .bind(&input.proof_points_json)
            .fetch_one(pool)
            .await
    }

    /// Find a workspace by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspaces WHERE id = $1");
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update scalar workspace fields. Absent fields keep their value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkspace,
    ) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!(
            "UPDATE workspaces \
             SET name = COALESCE($2, name), \
                 instantly_api_key = COALESCE($3, instantly_api_key), \
                 icp = COALESCE($4, icp), \
                 proof_points_json = COALESCE($5, proof_points_json) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.instantly_api_key)
            .bind(&input.icp)
            .bind(&input.proof_points_json)
            .fetch_optional(pool)
            .await
    }

    /// Replace the workspace playbook document wholesale.
    pub async fn set_playbook(
        pool: &PgPool,
        id: DbId,
        playbook: &serde_json::Value,
    ) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!(
            "UPDATE workspaces SET playbook_json = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(playbook)
            .fetch_optional(pool)
            .await
    }
}
