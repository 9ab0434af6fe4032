//! Sent campaign history model (PRD-18).

use serde::Serialize;
use sqlx::FromRow;

use outflow_core::types::{DbId, Timestamp};

/// A row from the `sent_campaigns` table: one successfully dispatched
/// provider campaign. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SentCampaign {
    pub id: DbId,
    pub workspace_id: DbId,
    /// The originating campaign, when the dispatch was tied to one.
    pub campaign_id: Option<DbId>,
    pub lead_batch_id: DbId,
    /// The provider's campaign id.
    pub instantly_campaign_id: String,
    pub name: String,
    /// Shared by the two rows of an A/B dispatch; null otherwise.
    pub ab_group_id: Option<String>,
    /// `"A"` or `"B"` for A/B rows; null otherwise.
    pub variant: Option<String>,
    pub leads_uploaded: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for one dispatch record.
#[derive(Debug, Clone)]
pub struct CreateSentCampaign {
    pub workspace_id: DbId,
    pub campaign_id: Option<DbId>,
    pub lead_batch_id: DbId,
    pub instantly_campaign_id: String,
    pub name: String,
    pub ab_group_id: Option<String>,
    pub variant: Option<String>,
    pub leads_uploaded: i64,
}
