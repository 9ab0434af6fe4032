//! Single-recipient test dispatch.
//!
//! A test send exercises the whole provider flow against one inbox: same
//! phases as a real dispatch but with minutes-scale delays, verification
//! off, and a `[TEST] `-prefixed name. It never launches a campaign. The
//! first lead in the batch serves as the content template and must pass
//! the gate on its own.

use outflow_core::campaign::validate_campaign_name;
use outflow_core::error::CoreError;
use outflow_core::quality_gate::evaluate_batch;
use outflow_core::sequence::{test_delays, variable_names};
use outflow_core::types::DbId;
use outflow_instantly::types::{BulkAddLeads, CreateCampaign, DelayUnit};
use serde::Deserialize;

use crate::dispatch::context::{enforce_gate, DispatchContext};
use crate::dispatch::send::{
    persist_sent, provider_lead, provider_steps, ramp_accounts, SendResponse,
};
use crate::error::AppResult;
use crate::state::AppState;

/// Body of `POST /api/v1/workspaces/{id}/dispatch/test`.
#[derive(Debug, Deserialize)]
pub struct TestSendRequest {
    pub batch_id: DbId,
    pub campaign_name: String,
    /// The one inbox the test sequence goes to.
    pub test_email: String,
    /// Optional stored campaign; only its playbook is used. A test send
    /// never changes campaign status.
    pub campaign_id: Option<DbId>,
}

/// The test address must look like an address; the provider rejects
/// anything without an `@` with an opaque error, so catch it here.
fn validate_test_email(email: &str) -> Result<(), CoreError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(CoreError::Validation(
            "test_email must be a valid email address".to_string(),
        ));
    }
    Ok(())
}

/// Run a test dispatch to a single address.
pub async fn dispatch_test_send(
    state: &AppState,
    workspace_id: DbId,
    req: &TestSendRequest,
) -> AppResult<SendResponse> {
    let base_name = req.campaign_name.trim();
    validate_campaign_name(base_name)?;
    validate_test_email(&req.test_email)?;

    let ctx =
        DispatchContext::resolve(&state.pool, workspace_id, req.batch_id, req.campaign_id).await?;
    let api_key = ctx.api_key()?.to_string();

    let template = ctx.leads.first().ok_or_else(|| {
        CoreError::Validation(
            "lead batch is empty; a test send uses the first lead as its template".to_string(),
        )
    })?;

    let report = evaluate_batch(&[template.to_gate_content()], ctx.plan.num_steps);
    enforce_gate(&report, ctx.plan.num_steps, false)?;

    let num_steps = ctx.plan.num_steps;
    let steps = provider_steps(num_steps, &test_delays(num_steps));
    let name = format!("[TEST] {base_name}");

    ramp_accounts(state, &api_key, None).await;

    let provider = state.provider.as_ref();
    let created = provider
        .create_campaign(
            &api_key,
            &CreateCampaign {
                name: name.clone(),
                steps,
                delay_unit: DelayUnit::Minutes,
            },
        )
        .await?;

    provider
        .add_campaign_variables(&api_key, &created.id, &variable_names(num_steps))
        .await?;

    // The template lead's content under the tester's address.
    let mut upload_lead = provider_lead(template, num_steps, None);
    upload_lead.email = req.test_email.trim().to_string();
    let upload = BulkAddLeads {
        leads: vec![upload_lead],
        verify_leads_on_import: false,
    };
    let outcome = provider.bulk_add_leads(&api_key, &created.id, &upload).await?;

    provider.activate_campaign(&api_key, &created.id).await?;
    tracing::info!(
        provider_campaign_id = %created.id,
        test_email = %req.test_email.trim(),
        "test campaign activated"
    );

    persist_sent(
        state,
        &ctx,
        &created.id,
        &name,
        None,
        None,
        outcome.leads_uploaded,
    )
    .await?;

    Ok(SendResponse {
        campaign_id: created.id,
        leads_uploaded: outcome.leads_uploaded,
        duplicated_leads: outcome.duplicated_leads,
        in_blocklist: outcome.in_blocklist,
        message: format!("Test campaign \"{name}\" sent to {}", req.test_email.trim()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
