//! Repository for the `lead_batches` table (PRD-9).

use sqlx::PgPool;

use outflow_core::types::DbId;

use crate::models::lead_batch::{CreateLeadBatch, LeadBatch};

/// Column list for `lead_batches` queries.
const COLUMNS: &str = "id, workspace_id, name, source, created_at, updated_at";

/// Provides CRUD operations for lead batches.
pub struct LeadBatchRepo;

impl LeadBatchRepo {
    /// Create a new batch in a workspace.
    pub async fn create(
        pool: &PgPool,
        workspace_id: DbId,
        input: &CreateLeadBatch,
    ) -> Result<LeadBatch, sqlx::Error> {
        let query = format!(
            "INSERT INTO lead_batches (workspace_id, name, source) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeadBatch>(&query)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.source)
            .fetch_one(pool)
            .await
    }

    /// Find a batch by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LeadBatch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lead_batches WHERE id = $1");
        sqlx::query_as::<_, LeadBatch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a workspace's batches, newest first.
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<LeadBatch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lead_batches \
             WHERE workspace_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, LeadBatch>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }
}
