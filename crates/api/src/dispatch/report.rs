//! Read-only pre-send validation checklist (PRD-15).

use outflow_core::quality_gate::{step_breakdown, LeadContent, ValidationReport};
use outflow_core::types::DbId;
use outflow_db::models::lead::Lead;
use outflow_db::DbPool;
use serde::Deserialize;

use crate::dispatch::context::DispatchContext;
use crate::error::AppResult;

/// Query parameters for `GET /api/v1/workspaces/{id}/dispatch/validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub batch_id: DbId,
    /// Optional campaign whose playbook wins over the workspace's.
    pub campaign_id: Option<DbId>,
}

/// Build the per-step readiness report for a batch. Resolution matches the
/// dispatch flow exactly; nothing here talks to the provider or writes.
pub async fn validation_report(
    pool: &DbPool,
    workspace_id: DbId,
    query: &ValidateQuery,
) -> AppResult<ValidationReport> {
    let ctx =
        DispatchContext::resolve(pool, workspace_id, query.batch_id, query.campaign_id).await?;
    let contents: Vec<LeadContent> = ctx.leads.iter().map(Lead::to_gate_content).collect();
    Ok(step_breakdown(&contents, ctx.plan.num_steps))
}
