//! Entity models and DTOs, one module per table.

pub mod campaign;
pub mod lead;
pub mod lead_batch;
pub mod sent_campaign;
pub mod workspace;
