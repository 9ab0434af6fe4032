//! Pre-dispatch sending-account ramp.
//!
//! Before a campaign activates, every sending account's daily cap is nudged
//! toward its target: accounts still in warmup get a low cap, fully warmed
//! accounts the full one. The pass is best-effort end to end; nothing here
//! may block a dispatch.

use crate::provider::CampaignProvider;
use crate::types::{RampOptions, RampOutcome};

/// Apply ramp limits across the workspace's sending accounts.
///
/// A listing failure degrades to an all-zero outcome, and individual PATCH
/// failures are counted and skipped. Accounts already at their target cap
/// are left alone.
pub async fn apply_ramp_for_unwarmed_accounts(
    provider: &dyn CampaignProvider,
    api_key: &str,
    opts: &RampOptions,
) -> RampOutcome {
    let accounts = match provider.list_accounts(api_key).await {
        Ok(accounts) => accounts,
        Err(err) => {
            tracing::warn!(error = %err, "account listing failed, skipping ramp");
            return RampOutcome::default();
        }
    };

    let mut outcome = RampOutcome::default();

    for account in accounts {
        if let Some(allowed) = &opts.account_emails {
            let matched = allowed
                .iter()
                .any(|email| email.eq_ignore_ascii_case(&account.email));
            if !matched {
                continue;
            }
        }
        outcome.accounts_seen += 1;

        let target = if account.is_warmed() {
            opts.warmed_daily_limit
        } else {
            opts.unwarmed_daily_limit
        };

        if account.daily_limit == Some(target) {
            outcome.already_at_target += 1;
            continue;
        }

        match provider
            .update_account_daily_limit(api_key, &account.email, target)
            .await
        {
            Ok(()) => {
                if account.is_warmed() {
                    outcome.updated_warmed += 1;
                } else {
                    outcome.updated_unwarmed += 1;
                }
            }
            Err(err) => {
                tracing::warn!(
                    account = %account.email,
                    error = %err,
                    "daily limit update failed, continuing ramp"
                );
                outcome.failed_updates += 1;
            }
        }
    }

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
