//! Real campaign dispatch, single and A/B (PRD-18, PRD-21).
//!
//! Provider phases run in a fixed order per campaign: create, declare
//! variables, bulk-add leads, activate. An A/B dispatch runs the pair of
//! each phase concurrently but never reorders phases within one campaign.

use std::collections::HashMap;

use outflow_core::ab_test::{
    assign_variants, generate_group_id, validate_ab_subjects, variant_name, VARIANT_A, VARIANT_B,
};
use outflow_core::campaign::{validate_campaign_name, STATUS_LAUNCHED};
use outflow_core::error::CoreError;
use outflow_core::quality_gate::{evaluate_batch, LeadContent};
use outflow_core::sequence::{
    body_to_html, body_variable, build_sequence_steps, production_delays, subject_variable,
    variable_names,
};
use outflow_core::types::DbId;
use outflow_db::models::lead::Lead;
use outflow_db::models::sent_campaign::CreateSentCampaign;
use outflow_db::repositories::{CampaignRepo, LeadRepo, SentCampaignRepo};
use outflow_instantly::ramp::apply_ramp_for_unwarmed_accounts;
use outflow_instantly::types::{
    BulkAddLeads, CampaignStep, CreateCampaign, DelayUnit, ProviderLead, RampOptions,
};
use serde::{Deserialize, Serialize};

use crate::dispatch::context::{enforce_gate, DispatchContext};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Ramp targets
// ---------------------------------------------------------------------------

/// Daily send cap for accounts still in warmup.
pub const UNWARMED_DAILY_LIMIT: i64 = 10;

/// Daily send cap for fully warmed accounts.
pub const WARMED_DAILY_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /api/v1/workspaces/{id}/dispatch`.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub batch_id: DbId,
    pub campaign_name: String,
    #[serde(default)]
    pub ab_test: bool,
    /// Test subject line for variant A; required iff `ab_test`.
    pub subject_line_a: Option<String>,
    /// Test subject line for variant B; required iff `ab_test`.
    pub subject_line_b: Option<String>,
    /// Allow-list for the account ramp; omitted means every account.
    pub account_emails: Option<Vec<String>>,
    /// Stored campaign to tie this dispatch to. Its playbook wins, and on
    /// success the campaign is marked launched.
    pub campaign_id: Option<DbId>,
    #[serde(default)]
    pub skip_failing_leads: bool,
}

/// Success payload for a dispatch. For an A/B send `campaign_id` is variant
/// A's provider id and the counters cover both campaigns.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub campaign_id: String,
    pub leads_uploaded: i64,
    pub duplicated_leads: i64,
    pub in_blocklist: i64,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run the full dispatch pipeline for one workspace.
pub async fn dispatch_campaign(
    state: &AppState,
    workspace_id: DbId,
    req: &SendRequest,
) -> AppResult<SendResponse> {
    let base_name = req.campaign_name.trim();
    validate_campaign_name(base_name)?;
    if req.ab_test {
        validate_ab_subjects(req.subject_line_a.as_deref(), req.subject_line_b.as_deref())?;
    }

    let ctx =
        DispatchContext::resolve(&state.pool, workspace_id, req.batch_id, req.campaign_id).await?;
    let api_key = ctx.api_key()?.to_string();

    if let Some(campaign) = &ctx.campaign {
        if campaign.status == STATUS_LAUNCHED {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "campaign {} has already been launched",
                campaign.id
            ))));
        }
    }
    if ctx.leads.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "lead batch is empty; import leads before sending".to_string(),
        )));
    }

    let contents: Vec<LeadContent> = ctx.leads.iter().map(Lead::to_gate_content).collect();
    let report = evaluate_batch(&contents, ctx.plan.num_steps);
    let passing = enforce_gate(&report, ctx.plan.num_steps, req.skip_failing_leads)?;
    let selected: Vec<&Lead> = passing.iter().map(|&idx| &ctx.leads[idx]).collect();

    let delays = production_delays(&ctx.plan.step_delays, &mut rand::rng());
    let steps = provider_steps(ctx.plan.num_steps, &delays);

    ramp_accounts(state, &api_key, req.account_emails.clone()).await;

    if req.ab_test {
        let subject_a = req.subject_line_a.as_deref().unwrap_or_default().trim();
        let subject_b = req.subject_line_b.as_deref().unwrap_or_default().trim();
        dispatch_ab(
            state, &ctx, &api_key, base_name, steps, &selected, subject_a, subject_b,
        )
        .await
    } else {
        dispatch_single(state, &ctx, &api_key, base_name, steps, &selected).await
    }
}

// ---------------------------------------------------------------------------
// Single branch
// ---------------------------------------------------------------------------

async fn dispatch_single(
    state: &AppState,
    ctx: &DispatchContext,
    api_key: &str,
    name: &str,
    steps: Vec<CampaignStep>,
    selected: &[&Lead],
) -> AppResult<SendResponse> {
    let provider = state.provider.as_ref();
    let num_steps = ctx.plan.num_steps;

    let created = provider
        .create_campaign(
            api_key,
            &CreateCampaign {
                name: name.to_string(),
                steps,
                delay_unit: DelayUnit::Days,
            },
        )
        .await?;

    provider
        .add_campaign_variables(api_key, &created.id, &variable_names(num_steps))
        .await?;

    let upload = BulkAddLeads {
        leads: selected
            .iter()
            .map(|lead| provider_lead(lead, num_steps, None))
            .collect(),
        verify_leads_on_import: true,
    };
    let outcome = provider.bulk_add_leads(api_key, &created.id, &upload).await?;

    provider.activate_campaign(api_key, &created.id).await?;
    tracing::info!(
        provider_campaign_id = %created.id,
        leads_uploaded = outcome.leads_uploaded,
        "campaign activated"
    );

    persist_sent(state, ctx, &created.id, name, None, None, outcome.leads_uploaded).await?;
    finalize_campaign(state, ctx, name).await?;

    Ok(SendResponse {
        campaign_id: created.id,
        leads_uploaded: outcome.leads_uploaded,
        duplicated_leads: outcome.duplicated_leads,
        in_blocklist: outcome.in_blocklist,
        message: format!(
            "Campaign \"{name}\" activated with {} leads",
            outcome.leads_uploaded
        ),
    })
}

// ---------------------------------------------------------------------------
// A/B branch
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
async fn dispatch_ab(
    state: &AppState,
    ctx: &DispatchContext,
    api_key: &str,
    base_name: &str,
    steps: Vec<CampaignStep>,
    selected: &[&Lead],
    subject_a: &str,
    subject_b: &str,
) -> AppResult<SendResponse> {
    let provider = state.provider.as_ref();
    let num_steps = ctx.plan.num_steps;

    let variants = assign_variants(selected.len());
    let mut ids_a: Vec<DbId> = Vec::new();
    let mut ids_b: Vec<DbId> = Vec::new();
    let mut leads_a: Vec<&Lead> = Vec::new();
    let mut leads_b: Vec<&Lead> = Vec::new();
    for (lead, variant) in selected.iter().zip(&variants) {
        if *variant == VARIANT_A {
            ids_a.push(lead.id);
            leads_a.push(lead);
        } else {
            ids_b.push(lead.id);
            leads_b.push(lead);
        }
    }

    let group_id = generate_group_id();
    let name_a = variant_name(base_name, VARIANT_A);
    let name_b = variant_name(base_name, VARIANT_B);

    let create_a = CreateCampaign {
        name: name_a.clone(),
        steps: steps.clone(),
        delay_unit: DelayUnit::Days,
    };
    let create_b = CreateCampaign {
        name: name_b.clone(),
        steps,
        delay_unit: DelayUnit::Days,
    };
    let (created_a, created_b) = tokio::join!(
        provider.create_campaign(api_key, &create_a),
        provider.create_campaign(api_key, &create_b),
    );
    let (created_a, created_b) = (created_a?, created_b?);

    let names = variable_names(num_steps);
    let (declared_a, declared_b) = tokio::join!(
        provider.add_campaign_variables(api_key, &created_a.id, &names),
        provider.add_campaign_variables(api_key, &created_b.id, &names),
    );
    declared_a?;
    declared_b?;

    let upload_a = BulkAddLeads {
        leads: leads_a
            .iter()
            .map(|lead| provider_lead(lead, num_steps, Some(subject_a)))
            .collect(),
        verify_leads_on_import: true,
    };
    let upload_b = BulkAddLeads {
        leads: leads_b
            .iter()
            .map(|lead| provider_lead(lead, num_steps, Some(subject_b)))
            .collect(),
        verify_leads_on_import: true,
    };
    let (outcome_a, outcome_b) = tokio::join!(
        provider.bulk_add_leads(api_key, &created_a.id, &upload_a),
        provider.bulk_add_leads(api_key, &created_b.id, &upload_b),
    );
    let (outcome_a, outcome_b) = (outcome_a?, outcome_b?);

    let (activated_a, activated_b) = tokio::join!(
        provider.activate_campaign(api_key, &created_a.id),
        provider.activate_campaign(api_key, &created_b.id),
    );
    activated_a?;
    activated_b?;
    tracing::info!(
        provider_campaign_a = %created_a.id,
        provider_campaign_b = %created_b.id,
        group_id = %group_id,
        "A/B campaign pair activated"
    );

    // Variant bookkeeping happens only once every network phase succeeded,
    // so an aborted dispatch leaves no stale assignments behind.
    LeadRepo::set_ab_variants(&state.pool, &ids_a, VARIANT_A).await?;
    LeadRepo::set_ab_variants(&state.pool, &ids_b, VARIANT_B).await?;

    persist_sent(
        state,
        ctx,
        &created_a.id,
        &name_a,
        Some(&group_id),
        Some(VARIANT_A),
        outcome_a.leads_uploaded,
    )
    .await?;
    persist_sent(
        state,
        ctx,
        &created_b.id,
        &name_b,
        Some(&group_id),
        Some(VARIANT_B),
        outcome_b.leads_uploaded,
    )
    .await?;
    finalize_campaign(state, ctx, base_name).await?;

    let combined = outcome_a.combined(outcome_b);
    Ok(SendResponse {
        campaign_id: created_a.id,
        leads_uploaded: combined.leads_uploaded,
        duplicated_leads: combined.duplicated_leads,
        in_blocklist: combined.in_blocklist,
        message: format!(
            "A/B campaigns \"{name_a}\" and \"{name_b}\" activated with {} leads",
            combined.leads_uploaded
        ),
    })
}

// ---------------------------------------------------------------------------
// Shared pieces (also used by the test-send path)
// ---------------------------------------------------------------------------

/// Apply the pre-dispatch account ramp. Best-effort: outcomes are logged,
/// never raised.
pub(super) async fn ramp_accounts(
    state: &AppState,
    api_key: &str,
    account_emails: Option<Vec<String>>,
) {
    let ramp = apply_ramp_for_unwarmed_accounts(
        state.provider.as_ref(),
        api_key,
        &RampOptions {
            unwarmed_daily_limit: UNWARMED_DAILY_LIMIT,
            warmed_daily_limit: WARMED_DAILY_LIMIT,
            account_emails,
        },
    )
    .await;
    tracing::info!(
        accounts_seen = ramp.accounts_seen,
        updated_unwarmed = ramp.updated_unwarmed,
        updated_warmed = ramp.updated_warmed,
        failed_updates = ramp.failed_updates,
        "sending-account ramp applied"
    );
}

/// Convert the core step templates into provider steps.
pub(super) fn provider_steps(num_steps: usize, delays: &[i64]) -> Vec<CampaignStep> {
    build_sequence_steps(num_steps, delays)
        .into_iter()
        .map(|step| CampaignStep {
            subject: step.subject,
            body: step.body,
            delay: step.delay,
        })
        .collect()
}

/// Build the provider upload record for one lead.
///
/// Bodies are converted to HTML line breaks. `subject_override` replaces the
/// step-1 subject only; every other step keeps the lead's own content.
pub(super) fn provider_lead(
    lead: &Lead,
    num_steps: usize,
    subject_override: Option<&str>,
) -> ProviderLead {
    let steps = lead.step_contents();
    let mut custom_variables = HashMap::new();
    for n in 1..=num_steps {
        let step = steps.get(n - 1);
        let subject = match (n, subject_override) {
            (1, Some(test_subject)) => test_subject.to_string(),
            _ => step.map(|s| s.subject.clone()).unwrap_or_default(),
        };
        let body = step.map(|s| s.body.as_str()).unwrap_or_default();
        custom_variables.insert(subject_variable(n), subject);
        custom_variables.insert(body_variable(n), body_to_html(body));
    }
    ProviderLead {
        email: lead.email.clone(),
        first_name: lead.first_name.clone(),
        last_name: lead.last_name.clone(),
        company_name: lead.company.clone(),
        custom_variables,
    }
}

/// Record one provider campaign in the send history.
pub(super) async fn persist_sent(
    state: &AppState,
    ctx: &DispatchContext,
    instantly_campaign_id: &str,
    name: &str,
    ab_group_id: Option<&str>,
    variant: Option<&str>,
    leads_uploaded: i64,
) -> AppResult<()> {
    SentCampaignRepo::create(
        &state.pool,
        &CreateSentCampaign {
            workspace_id: ctx.workspace.id,
            campaign_id: ctx.campaign.as_ref().map(|c| c.id),
            lead_batch_id: ctx.batch.id,
            instantly_campaign_id: instantly_campaign_id.to_string(),
            name: name.to_string(),
            ab_group_id: ab_group_id.map(str::to_string),
            variant: variant.map(str::to_string),
            leads_uploaded,
        },
    )
    .await?;
    Ok(())
}

/// Mark the tied campaign launched under the base name actually sent.
async fn finalize_campaign(state: &AppState, ctx: &DispatchContext, base_name: &str) -> AppResult<()> {
    if let Some(campaign) = &ctx.campaign {
        CampaignRepo::mark_launched(&state.pool, campaign.id, base_name).await?;
        tracing::info!(campaign_id = campaign.id, "campaign marked launched");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
