//! Lead entity model and generated-content access (PRD-9).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use outflow_core::quality_gate::{LeadContent, StepContent};
use outflow_core::types::{DbId, Timestamp};

/// A row from the `leads` table.
///
/// The dispatch pipeline treats lead content as read-only: it is written by
/// the personalization generator, never here.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub lead_batch_id: DbId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub industry: Option<String>,
    /// Canonical generated content: JSON array of `{subject, body}` pairs in
    /// step order.
    pub steps_json: Option<serde_json::Value>,
    // Deprecated mirror columns, read as a fallback when steps_json is not
    // an array. Never written by new code.
    pub step1_subject: Option<String>,
    pub step1_body: Option<String>,
    pub step2_subject: Option<String>,
    pub step2_body: Option<String>,
    pub step3_subject: Option<String>,
    pub step3_body: Option<String>,
    /// Assigned at dispatch time for A/B campaigns; null otherwise.
    pub ab_variant: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    /// Ordered step content: `steps_json` when it is an array, else the
    /// legacy mirror columns, else nothing.
    pub fn step_contents(&self) -> Vec<StepContent> {
        if let Some(array) = self.steps_json.as_ref().and_then(|v| v.as_array()) {
            return array
                .iter()
                .map(|entry| StepContent {
                    subject: string_at(entry, "subject"),
                    body: string_at(entry, "body"),
                })
                .collect();
        }

        let mirrors = [
            (&self.step1_subject, &self.step1_body),
            (&self.step2_subject, &self.step2_body),
            (&self.step3_subject, &self.step3_body),
        ];
        if mirrors.iter().all(|(s, b)| s.is_none() && b.is_none()) {
            return Vec::new();
        }
        mirrors
            .iter()
            .map(|&(subject, body)| StepContent {
                subject: subject.clone().unwrap_or_default(),
                body: body.clone().unwrap_or_default(),
            })
            .collect()
    }

    /// This lead as the quality gate sees it.
    pub fn to_gate_content(&self) -> LeadContent {
        LeadContent {
            email: self.email.clone(),
            steps: self.step_contents(),
        }
    }
}

fn string_at(entry: &serde_json::Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// DTO for inserting leads during batch import.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLead {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub industry: Option<String>,
    pub steps_json: Option<serde_json::Value>,
}

/// Query parameters for paginated lead listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
