//! Request and response types for the Instantly API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Public API base URL; overridable through server config for tests.
pub const DEFAULT_BASE_URL: &str = "https://api.instantly.ai/api/v2";

// ---------------------------------------------------------------------------
// Sending accounts
// ---------------------------------------------------------------------------

/// One sending account attached to an Instantly workspace.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendingAccount {
    pub email: String,
    /// Set once the account has finished its warmup period. Absent or
    /// `false` means the account is still warming.
    #[serde(default)]
    pub warmup_complete: bool,
    /// Current daily send cap, when the API reports one.
    #[serde(default)]
    pub daily_limit: Option<i64>,
}

impl SendingAccount {
    pub fn is_warmed(&self) -> bool {
        self.warmup_complete
    }
}

// ---------------------------------------------------------------------------
// Campaign creation
// ---------------------------------------------------------------------------

/// Unit for step delays. Real sends schedule in days; test sends compress
/// the whole sequence into minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    Days,
    Minutes,
}

/// One sequence step as uploaded to the provider. Subject and body are
/// placeholder templates; lead copy arrives separately as custom variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStep {
    pub subject: String,
    pub body: String,
    pub delay: i64,
}

/// Everything needed to create one provider campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCampaign {
    pub name: String,
    pub steps: Vec<CampaignStep>,
    pub delay_unit: DelayUnit,
}

/// A campaign the provider confirmed creating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCampaign {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Lead upload
// ---------------------------------------------------------------------------

/// One lead in a bulk upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderLead {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// The `stepN_subject` / `stepN_body` content for this lead.
    #[serde(default)]
    pub custom_variables: HashMap<String, String>,
}

/// A bulk lead upload for one campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAddLeads {
    pub leads: Vec<ProviderLead>,
    /// Verify addresses during import. Off for test sends.
    pub verify_leads_on_import: bool,
}

/// Provider-reported outcome of a bulk upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BulkAddOutcome {
    #[serde(default)]
    pub leads_uploaded: i64,
    #[serde(default)]
    pub duplicated_leads: i64,
    #[serde(default)]
    pub in_blocklist: i64,
}

impl BulkAddOutcome {
    /// Sum two outcomes. An A/B dispatch reports one combined count across
    /// both variant campaigns.
    pub fn combined(self, other: BulkAddOutcome) -> BulkAddOutcome {
        BulkAddOutcome {
            leads_uploaded: self.leads_uploaded + other.leads_uploaded,
            duplicated_leads: self.duplicated_leads + other.duplicated_leads,
            in_blocklist: self.in_blocklist + other.in_blocklist,
        }
    }
}

// ---------------------------------------------------------------------------
// Account ramp
// ---------------------------------------------------------------------------

/// Inputs to the pre-dispatch account ramp.
#[derive(Debug, Clone)]
pub struct RampOptions {
    /// Daily cap applied to accounts still in warmup.
    pub unwarmed_daily_limit: i64,
    /// Daily cap applied to fully warmed accounts.
    pub warmed_daily_limit: i64,
    /// Restrict the ramp to these accounts; `None` ramps every account.
    pub account_emails: Option<Vec<String>>,
}

/// What the ramp actually did. The pass is best-effort, so failures are
/// counted rather than raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RampOutcome {
    /// Accounts considered after applying the allow-list.
    pub accounts_seen: usize,
    pub updated_unwarmed: usize,
    pub updated_warmed: usize,
    /// Accounts already at their target limit; no PATCH issued.
    pub already_at_target: usize,
    pub failed_updates: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
