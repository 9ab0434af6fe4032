//! Repositories, one per table.

pub mod campaign_repo;
pub mod lead_batch_repo;
pub mod lead_repo;
pub mod sent_campaign_repo;
pub mod workspace_repo;

pub use campaign_repo::CampaignRepo;
pub use lead_batch_repo::LeadBatchRepo;
pub use lead_repo::LeadRepo;
pub use sent_campaign_repo::SentCampaignRepo;
pub use workspace_repo::WorkspaceRepo;
