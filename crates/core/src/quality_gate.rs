//! Lead content quality gate (PRD-14).
//!
//! Every lead must carry generated subject/body content for each step of the
//! send plan before a campaign may go out. The gate enforces fixed trimmed
//! length minimums per step and reports failures in operator-readable form.
//! Thresholds are deliberately not configurable per call.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Minimum trimmed subject length, in characters.
pub const MIN_SUBJECT_CHARS: usize = 10;

/// Minimum trimmed body length, in characters.
pub const MIN_BODY_CHARS: usize = 50;

/// Cap on sample failures included in a dispatch rejection payload.
pub const MAX_REJECTION_SAMPLES: usize = 15;

/// Cap on per-step sample failures in the validation report.
pub const MAX_STEP_SAMPLES: usize = 5;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// One generated subject/body pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, Serialize)]
pub struct StepContent {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

/// The gate's view of one lead: its address plus ordered step content.
/// Steps beyond the plan's `num_steps` are ignored; missing steps count as
/// empty and therefore fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadContent {
    pub email: String,
    pub steps: Vec<StepContent>,
}

/// A single gate failure, reported with a 1-based step number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    pub lead_email: String,
    pub step: usize,
    pub reason: String,
}

/// Result of gating a whole batch. `passing` holds indices into the input
/// slice so callers can subset the original leads without cloning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport {
    pub total_leads: usize,
    pub passing: Vec<usize>,
    pub failures: Vec<StepFailure>,
}

impl GateReport {
    /// True when every lead in a non-empty batch passed.
    pub fn all_passed(&self) -> bool {
        self.total_leads > 0 && self.passing.len() == self.total_leads
    }

    /// Failure counts grouped by 1-based step number, ascending.
    pub fn failures_by_step(&self) -> Vec<(usize, usize)> {
        let mut counts: std::collections::BTreeMap<usize, usize> = std::collections::BTreeMap::new();
        for failure in &self.failures {
            *counts.entry(failure.step).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Check one subject/body pair. Subject is checked before body; at most one
/// reason comes back per step.
fn content_failure(subject: &str, body: &str) -> Option<String> {
    let subject_len = subject.trim().chars().count();
    if subject_len < MIN_SUBJECT_CHARS {
        return Some(format!(
            "subject too short ({subject_len} chars, min {MIN_SUBJECT_CHARS})"
        ));
    }
    let body_len = body.trim().chars().count();
    if body_len < MIN_BODY_CHARS {
        return Some(format!(
            "body too short ({body_len} chars, min {MIN_BODY_CHARS})"
        ));
    }
    None
}

/// First failing step for a lead, or `None` when every required step passes.
///
/// Evaluation short-circuits: a lead failing step 2 is never also reported
/// for step 3, so each lead contributes at most one failure record.
pub fn first_failure(lead: &LeadContent, num_steps: usize) -> Option<StepFailure> {
    for step_idx in 0..num_steps {
        let (subject, body) = match lead.steps.get(step_idx) {
            Some(step) => (step.subject.as_str(), step.body.as_str()),
            None => ("", ""),
        };
        if let Some(reason) = content_failure(subject, body) {
            return Some(StepFailure {
                lead_email: lead.email.clone(),
                step: step_idx + 1,
                reason,
            });
        }
    }
    None
}

/// Gate a batch of leads against a plan's step count.
pub fn evaluate_batch(leads: &[LeadContent], num_steps: usize) -> GateReport {
    let mut passing = Vec::new();
    let mut failures = Vec::new();

    for (idx, lead) in leads.iter().enumerate() {
        match first_failure(lead, num_steps) {
            None => passing.push(idx),
            Some(failure) => failures.push(failure),
        }
    }

    GateReport {
        total_leads: leads.len(),
        passing,
        failures,
    }
}

// ---------------------------------------------------------------------------
// Validation report (PRD-15)
// ---------------------------------------------------------------------------

/// Per-step outcome for the pre-send validation checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepBreakdown {
    pub step: usize,
    pub passed: usize,
    pub failed: usize,
    pub passed_all_leads: bool,
    pub sample_failures: Vec<StepFailure>,
}

/// The full read-only validation report for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub total_leads: usize,
    pub leads_passing_all_steps: usize,
    /// Leads whose every required step is entirely blank after trimming.
    pub leads_with_no_content: usize,
    pub can_send: bool,
    pub steps: Vec<StepBreakdown>,
}

/// Build the per-step breakdown for the validation endpoint.
///
/// Unlike [`evaluate_batch`], this does not short-circuit: a lead with weak
/// content in several steps is counted against each of them, which is what
/// the checklist UI needs.
pub fn step_breakdown(leads: &[LeadContent], num_steps: usize) -> ValidationReport {
    let mut steps = Vec::with_capacity(num_steps);

    for step_idx in 0..num_steps {
        let mut passed = 0usize;
        let mut failed = 0usize;
        let mut samples = Vec::new();

        for lead in leads {
            let (subject, body) = step_fields(lead, step_idx);
            match content_failure(subject, body) {
                None => passed += 1,
                Some(reason) => {
                    failed += 1;
                    if samples.len() < MAX_STEP_SAMPLES {
                        samples.push(StepFailure {
                            lead_email: lead.email.clone(),
                            step: step_idx + 1,
                            reason,
                        });
                    }
                }
            }
        }

        steps.push(StepBreakdown {
            step: step_idx + 1,
            passed,
            failed,
            passed_all_leads: failed == 0,
            sample_failures: samples,
        });
    }

    let leads_passing_all_steps = leads
        .iter()
        .filter(|lead| first_failure(lead, num_steps).is_none())
        .count();
    let leads_with_no_content = leads
        .iter()
        .filter(|lead| has_no_content(lead, num_steps))
        .count();

    ValidationReport {
        total_leads: leads.len(),
        leads_passing_all_steps,
        leads_with_no_content,
        can_send: leads_passing_all_steps == leads.len() && !leads.is_empty(),
        steps,
    }
}

fn step_fields(lead: &LeadContent, step_idx: usize) -> (&str, &str) {
    match lead.steps.get(step_idx) {
        Some(step) => (step.subject.as_str(), step.body.as_str()),
        None => ("", ""),
    }
}

fn has_no_content(lead: &LeadContent, num_steps: usize) -> bool {
    (0..num_steps).all(|idx| {
        let (subject, body) = step_fields(lead, idx);
        subject.trim().is_empty() && body.trim().is_empty()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
