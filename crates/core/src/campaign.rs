//! Campaign lifecycle constants and transition rules (PRD-18).

use crate::error::{CoreError, CoreResult};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Freshly created; sequences may still be edited or regenerated.
pub const STATUS_DRAFT: &str = "draft";
/// Operator has reviewed generated sequences and marked them ready.
pub const STATUS_SEQUENCES_READY: &str = "sequences_ready";
/// A real dispatch succeeded. Terminal for this pipeline.
pub const STATUS_LAUNCHED: &str = "launched";

/// All valid campaign statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_SEQUENCES_READY, STATUS_LAUNCHED];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> CoreResult<()> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown campaign status: '{status}'. Valid statuses: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate an operator-initiated status change.
///
/// `draft` and `sequences_ready` move freely in both directions. `launched`
/// is set only by a successful dispatch and never leaves that state, so any
/// operator write touching a launched campaign's status is rejected.
pub fn validate_transition(from: &str, to: &str) -> CoreResult<()> {
    if from == STATUS_LAUNCHED {
        return Err(CoreError::Conflict(
            "campaign is already launched".to_string(),
        ));
    }
    if to == STATUS_LAUNCHED {
        return Err(CoreError::Validation(
            "status 'launched' is set by dispatch, not by update".to_string(),
        ));
    }
    validate_status(to)
}

/// Validate a campaign name: non-blank after trimming.
pub fn validate_campaign_name(name: &str) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "campaign name must not be blank".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
