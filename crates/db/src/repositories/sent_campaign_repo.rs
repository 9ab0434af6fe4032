//! Repository for the `sent_campaigns` table (PRD-18).

use sqlx::PgPool;

use outflow_core::types::DbId;

use crate::models::sent_campaign::{CreateSentCampaign, SentCampaign};

/// Column list for `sent_campaigns` queries.
const COLUMNS: &str = "\
    id, workspace_id, campaign_id, lead_batch_id, instantly_campaign_id, \
    name, ab_group_id, variant, leads_uploaded, created_at, updated_at";

/// Provides operations for the dispatch history ledger.
///
/// Rows are append-only: one per provider campaign actually created,
/// including test sends and both halves of an A/B pair.
pub struct SentCampaignRepo;

impl SentCampaignRepo {
    /// Record one dispatched provider campaign.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSentCampaign,
    ) -> Result<SentCampaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO sent_campaigns \
                 (workspace_id, campaign_id, lead_batch_id, instantly_campaign_id, \
                  name, ab_group_id, variant, leads_uploaded) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SentCampaign>(&query)
            .bind(input.workspace_id)
            .bind(input.campaign_id)
            .bind(input.lead_batch_id)
            .bind(&input.instantly_campaign_id)
            .bind(&input.name)
            .bind(&input.ab_group_id)
            .bind(&input.variant)
            .bind(input.leads_uploaded)
            .fetch_one(pool)
            .await
    }

    /// Find a sent campaign by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SentCampaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sent_campaigns WHERE id = $1");
        sqlx::query_as::<_, SentCampaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a workspace's dispatch history, newest first.
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<SentCampaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sent_campaigns \
             WHERE workspace_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SentCampaign>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }
}
