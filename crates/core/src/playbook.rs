//! Playbook parsing and send-plan normalization (PRD-7).
//!
//! A workspace stores its outreach playbook as an opaque JSON document, and a
//! campaign may carry its own override copy. Two shapes exist in the wild: the
//! guideline form the current editor writes, and the legacy per-step form
//! older workspaces still hold. This module normalizes either shape into a
//! [`SendPlan`] and degrades to `None` for anything malformed, so callers
//! surface "no playbook configured" rather than a parse error.

use serde_json::Value;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum number of sequence steps in a send plan.
pub const MIN_STEPS: usize = 1;

/// Maximum number of sequence steps in a send plan.
pub const MAX_STEPS: usize = 10;

/// Step count assumed when the guideline form omits `numSteps`.
pub const DEFAULT_NUM_STEPS: usize = 3;

/// Gap in days assumed for steps the document gives no delay for.
pub const DEFAULT_STEP_DELAY_DAYS: i64 = 3;

// ---------------------------------------------------------------------------
// Normalized plan
// ---------------------------------------------------------------------------

/// A concrete send plan derived from a playbook document.
///
/// `num_steps` is the single source of truth for how many subject/body pairs
/// each lead must carry, and `step_delays` always holds exactly `num_steps`
/// entries.
#[derive(Debug, Clone, PartialEq)]
pub struct SendPlan {
    pub num_steps: usize,
    /// Planned gap in days before each step, index 0 = first touch.
    pub step_delays: Vec<i64>,
    pub content: PlanContent,
}

/// The content source a plan was built from. Exactly one form survives
/// parsing; when a document carries both keys the guideline form wins.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanContent {
    /// Guideline form: prose instructions the generator worked from.
    Guidelines { tone: String, structure: String },
    /// Legacy form: fully written-out steps.
    LegacySteps(Vec<LegacyStep>),
}

/// One written-out step from a legacy-form playbook.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyStep {
    pub step_number: i64,
    pub subject: String,
    pub body: String,
    pub delay_days: i64,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a stored playbook document into a normalized [`SendPlan`].
///
/// Returns `None` when the document is absent, null, not an object, or has
/// neither a `guidelines` object nor a non-empty `steps` array. Malformed
/// leaf values degrade to defaults instead of failing the parse.
pub fn parse_send_plan(doc: Option<&Value>) -> Option<SendPlan> {
    let obj = doc?.as_object()?;

    if let Some(guidelines) = obj.get("guidelines").and_then(Value::as_object) {
        return Some(plan_from_guidelines(guidelines));
    }

    match obj.get("steps").and_then(Value::as_array) {
        Some(steps) if !steps.is_empty() => Some(plan_from_legacy_steps(steps)),
        _ => None,
    }
}

fn plan_from_guidelines(guidelines: &serde_json::Map<String, Value>) -> SendPlan {
    let num_steps = guidelines
        .get("numSteps")
        .and_then(Value::as_i64)
        .map(clamp_num_steps)
        .unwrap_or(DEFAULT_NUM_STEPS);

    let planned: Vec<i64> = guidelines
        .get("stepDelays")
        .and_then(Value::as_array)
        .map(|delays| {
            delays
                .iter()
                .map(|d| d.as_i64().unwrap_or(DEFAULT_STEP_DELAY_DAYS))
                .collect()
        })
        .unwrap_or_default();

    SendPlan {
        num_steps,
        step_delays: normalize_delays(planned, num_steps),
        content: PlanContent::Guidelines {
            tone: string_field(guidelines, "tone"),
            structure: string_field(guidelines, "structure"),
        },
    }
}

fn plan_from_legacy_steps(steps: &[Value]) -> SendPlan {
    let parsed: Vec<LegacyStep> = steps
        .iter()
        .take(MAX_STEPS)
        .enumerate()
        .map(|(i, step)| {
            let obj = step.as_object();
            LegacyStep {
                step_number: obj
                    .and_then(|o| o.get("stepNumber"))
                    .and_then(Value::as_i64)
                    .unwrap_or(i as i64 + 1),
                subject: obj.map(|o| string_field(o, "subject")).unwrap_or_default(),
                body: obj.map(|o| string_field(o, "body")).unwrap_or_default(),
                delay_days: obj
                    .and_then(|o| o.get("delayDays"))
                    .and_then(Value::as_i64)
                    .unwrap_or(DEFAULT_STEP_DELAY_DAYS),
            }
        })
        .collect();

    let num_steps = parsed.len();
    let step_delays = parsed.iter().map(|s| s.delay_days).collect();

    SendPlan {
        num_steps,
        step_delays: normalize_delays(step_delays, num_steps),
        content: PlanContent::LegacySteps(parsed),
    }
}

/// Clamp a raw `numSteps` value into `[MIN_STEPS, MAX_STEPS]`.
pub fn clamp_num_steps(raw: i64) -> usize {
    raw.clamp(MIN_STEPS as i64, MAX_STEPS as i64) as usize
}

/// Truncate or pad a delay list to exactly `num_steps` entries.
fn normalize_delays(mut delays: Vec<i64>, num_steps: usize) -> Vec<i64> {
    delays.truncate(num_steps);
    delays.resize(num_steps, DEFAULT_STEP_DELAY_DAYS);
    delays
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
