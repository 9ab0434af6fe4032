//! Resolution and gate policy shared by send, test send, and validate.

use outflow_core::error::CoreError;
use outflow_core::playbook::{parse_send_plan, SendPlan};
use outflow_core::quality_gate::{GateReport, StepFailure, MAX_REJECTION_SAMPLES};
use outflow_core::types::DbId;
use outflow_db::models::campaign::Campaign;
use outflow_db::models::lead::Lead;
use outflow_db::models::lead_batch::LeadBatch;
use outflow_db::models::workspace::Workspace;
use outflow_db::repositories::{CampaignRepo, LeadBatchRepo, LeadRepo, WorkspaceRepo};
use outflow_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Dispatch context
// ---------------------------------------------------------------------------

/// Everything a dispatch-family endpoint needs, loaded and cross-checked.
///
/// Built once per request by [`DispatchContext::resolve`]; the send, test
/// send, and validate flows all start from the same resolution.
#[derive(Debug)]
pub struct DispatchContext {
    pub workspace: Workspace,
    /// Present when the request tied the dispatch to a stored campaign.
    pub campaign: Option<Campaign>,
    pub batch: LeadBatch,
    /// Batch leads in insertion order. A/B assignment alternates over this
    /// exact ordering.
    pub leads: Vec<Lead>,
    pub plan: SendPlan,
}

impl DispatchContext {
    /// Load and cross-check the workspace, optional campaign, and batch,
    /// then parse the effective playbook into a plan.
    ///
    /// The campaign's playbook wins when the dispatch names a campaign that
    /// has one; otherwise the workspace playbook applies. Entities belonging
    /// to a different workspace resolve as not found.
    pub async fn resolve(
        pool: &DbPool,
        workspace_id: DbId,
        batch_id: DbId,
        campaign_id: Option<DbId>,
    ) -> AppResult<Self> {
        let workspace = WorkspaceRepo::find_by_id(pool, workspace_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "workspace",
                id: workspace_id,
            })?;

        let campaign = match campaign_id {
            Some(id) => {
                let campaign = CampaignRepo::find_by_id(pool, id)
                    .await?
                    .filter(|c| c.workspace_id == workspace.id)
                    .ok_or(CoreError::NotFound {
                        entity: "campaign",
                        id,
                    })?;
                Some(campaign)
            }
            None => None,
        };

        let batch = LeadBatchRepo::find_by_id(pool, batch_id)
            .await?
            .filter(|b| b.workspace_id == workspace.id)
            .ok_or(CoreError::NotFound {
                entity: "lead_batch",
                id: batch_id,
            })?;

        let leads = LeadRepo::list_all_by_batch(pool, batch.id).await?;

        let playbook = campaign
            .as_ref()
            .and_then(|c| c.playbook_json.as_ref())
            .or(workspace.playbook_json.as_ref());

        let plan = parse_send_plan(playbook).ok_or_else(|| {
            CoreError::Validation(
                "No playbook configured; set one on the workspace or campaign before sending"
                    .to_string(),
            )
        })?;

        Ok(DispatchContext {
            workspace,
            campaign,
            batch,
            leads,
            plan,
        })
    }

    /// The workspace's Instantly key, required for anything that talks to
    /// the provider. The validate endpoint never calls this.
    pub fn api_key(&self) -> AppResult<&str> {
        self.workspace
            .instantly_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "Workspace has no Instantly API key configured".to_string(),
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Gate policy
// ---------------------------------------------------------------------------

/// Failure count for one 1-based step.
#[derive(Debug, Clone, Serialize)]
pub struct StepFailureCount {
    pub step: usize,
    pub failed: usize,
}

/// Diagnostic payload returned with a 422 when the gate blocks a dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct GateRejection {
    pub num_steps: usize,
    pub total_leads: usize,
    pub leads_passing_all_steps: usize,
    pub failures_by_step: Vec<StepFailureCount>,
    /// At most [`MAX_REJECTION_SAMPLES`] concrete failures for the UI.
    pub sample_failures: Vec<StepFailure>,
}

impl GateRejection {
    pub fn from_report(report: &GateReport, num_steps: usize) -> Self {
        GateRejection {
            num_steps,
            total_leads: report.total_leads,
            leads_passing_all_steps: report.passing.len(),
            failures_by_step: report
                .failures_by_step()
                .into_iter()
                .map(|(step, failed)| StepFailureCount { step, failed })
                .collect(),
            sample_failures: report
                .failures
                .iter()
                .take(MAX_REJECTION_SAMPLES)
                .cloned()
                .collect(),
        }
    }

    /// One-line summary used as the `error` field of the 422 body.
    pub fn summary(&self) -> String {
        format!(
            "{} of {} leads failed the content quality gate",
            self.total_leads - self.leads_passing_all_steps,
            self.total_leads
        )
    }
}

/// Apply the gate blocking policy and return the indices of leads allowed
/// through.
///
/// Zero passing leads always blocks. A partial pass blocks unless the
/// caller opted into `skip_failing_leads`, in which case only the passing
/// subset goes out and the rest stay in the batch untouched.
pub fn enforce_gate(
    report: &GateReport,
    num_steps: usize,
    skip_failing_leads: bool,
) -> AppResult<Vec<usize>> {
    if report.passing.is_empty() {
        return Err(AppError::QualityGate(GateRejection::from_report(
            report, num_steps,
        )));
    }
    if report.passing.len() < report.total_leads && !skip_failing_leads {
        return Err(AppError::QualityGate(GateRejection::from_report(
            report, num_steps,
        )));
    }
    Ok(report.passing.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
