//! Lead batch entity model and DTOs (PRD-9).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use outflow_core::types::{DbId, Timestamp};

/// A row from the `lead_batches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeadBatch {
    pub id: DbId,
    pub workspace_id: DbId,
    pub name: String,
    /// Where the batch came from (importer name, upload filename).
    pub source: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a batch during import.
#[derive(Debug, Deserialize)]
pub struct CreateLeadBatch {
    pub name: String,
    pub source: Option<String>,
}
