//! Repository for the `leads` table (PRD-9).

use sqlx::PgPool;

use outflow_core::types::DbId;

use crate::models::lead::{CreateLead, Lead, LeadListQuery};

/// Column list for `leads` queries.
const COLUMNS: &str = "\
    id, lead_batch_id, email, first_name, last_name, company, job_title, \
    industry, steps_json, step1_subject, step1_body, step2_subject, \
    step2_body, step3_subject, step3_body, ab_variant, created_at, updated_at";

/// Maximum page size for lead listing.
const MAX_LIMIT: i64 = 500;

/// Default page size for lead listing.
const DEFAULT_LIMIT: i64 = 100;

/// Provides CRUD operations for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert one lead into a batch.
    pub async fn create(
        pool: &PgPool,
        lead_batch_id: DbId,
        input: &CreateLead,
    ) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads \
                 (lead_batch_id, email, first_name, last_name, company, \
                  job_title, industry, steps_json) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(lead_batch_id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.company)
            .bind(&input.job_title)
            .bind(&input.industry)
            .bind(&input.steps_json)
            .fetch_one(pool)
            .await
    }

    /// Find a lead by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a batch's full membership in insertion order.
    ///
    /// Dispatch depends on this ordering: A/B assignment alternates over the
    /// list as returned here, so it must be stable across calls.
    pub async fn list_all_by_batch(
        pool: &PgPool,
        lead_batch_id: DbId,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads \
             WHERE lead_batch_id = $1 \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(lead_batch_id)
            .fetch_all(pool)
            .await
    }

    /// List a page of a batch's leads for the UI.
    pub async fn list_by_batch(
        pool: &PgPool,
        lead_batch_id: DbId,
        params: &LeadListQuery,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM leads \
             WHERE lead_batch_id = $1 \
             ORDER BY id ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(lead_batch_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a batch's leads.
    pub async fn count_by_batch(pool: &PgPool, lead_batch_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM leads WHERE lead_batch_id = $1")
                .bind(lead_batch_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Stamp one variant label onto a set of leads. Called once per group
    /// during an A/B dispatch.
    pub async fn set_ab_variants(
        pool: &PgPool,
        lead_ids: &[DbId],
        variant: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE leads SET ab_variant = $2 WHERE id = ANY($1)")
            .bind(lead_ids)
            .bind(variant)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
