//! Sequence step templates and delay scheduling (PRD-7).
//!
//! Provider campaigns never contain lead copy directly. Each step is a
//! placeholder template (`{{step1_subject}}` / `{{step1_body}}`) and the real
//! content arrives per lead as custom variables at upload time, so one
//! campaign serves every lead in the batch.

use rand::Rng;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Delay policy
// ---------------------------------------------------------------------------

/// Earliest the first touch may go out, in days.
pub const MIN_FIRST_STEP_DELAY_DAYS: i64 = 1;

/// Base minimum gap between follow-up steps, in days. Up to one extra day of
/// jitter is added on top so recipients do not see a metronome cadence.
pub const MIN_FOLLOWUP_DELAY_DAYS: i64 = 2;

/// Gap between steps in a test send, in minutes.
pub const TEST_STEP_DELAY_MINUTES: i64 = 2;

/// Compute the real-send delay schedule from a plan's step delays.
///
/// The first entry is floored at [`MIN_FIRST_STEP_DELAY_DAYS`]; every later
/// entry is floored at [`MIN_FOLLOWUP_DELAY_DAYS`] plus a 0-or-1 day jitter
/// drawn independently per step. Planned delays above the floor pass through
/// untouched.
pub fn production_delays<R: Rng + ?Sized>(planned: &[i64], rng: &mut R) -> Vec<i64> {
    planned
        .iter()
        .enumerate()
        .map(|(idx, &days)| {
            if idx == 0 {
                days.max(MIN_FIRST_STEP_DELAY_DAYS)
            } else {
                days.max(MIN_FOLLOWUP_DELAY_DAYS + rng.random_range(0..=1))
            }
        })
        .collect()
}

/// Compute the test-send delay schedule: immediate first touch, then a fixed
/// short gap. Values are interpreted in minutes via the campaign-level unit.
pub fn test_delays(num_steps: usize) -> Vec<i64> {
    (0..num_steps)
        .map(|idx| if idx == 0 { 0 } else { TEST_STEP_DELAY_MINUTES })
        .collect()
}

// ---------------------------------------------------------------------------
// Step templates
// ---------------------------------------------------------------------------

/// One provider sequence step: placeholder subject/body plus its delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceStep {
    pub subject: String,
    pub body: String,
    pub delay: i64,
}

/// Custom-variable name carrying the subject for 1-based step `n`.
pub fn subject_variable(step: usize) -> String {
    format!("step{step}_subject")
}

/// Custom-variable name carrying the body for 1-based step `n`.
pub fn body_variable(step: usize) -> String {
    format!("step{step}_body")
}

/// All custom-variable names a campaign with `num_steps` steps declares,
/// subject before body, in step order.
pub fn variable_names(num_steps: usize) -> Vec<String> {
    (1..=num_steps)
        .flat_map(|n| [subject_variable(n), body_variable(n)])
        .collect()
}

/// Build the ordered step templates for a campaign. `delays` must come from
/// [`production_delays`] or [`test_delays`] and have one entry per step;
/// a short list falls back to the follow-up floor.
pub fn build_sequence_steps(num_steps: usize, delays: &[i64]) -> Vec<SequenceStep> {
    (1..=num_steps)
        .map(|n| SequenceStep {
            subject: format!("{{{{{}}}}}", subject_variable(n)),
            body: format!("{{{{{}}}}}", body_variable(n)),
            delay: delays.get(n - 1).copied().unwrap_or(MIN_FOLLOWUP_DELAY_DAYS),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Body formatting
// ---------------------------------------------------------------------------

/// Convert plain-text newlines to `<br>` for the provider's HTML editor.
/// CRLF is normalized first so Windows-origin content does not double-break.
pub fn body_to_html(body: &str) -> String {
    body.replace("\r\n", "\n").replace('\n', "<br>")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
