//! Client for the Instantly campaign platform (PRD-18).
//!
//! Wraps the Instantly v2 HTTP API behind the [`provider::CampaignProvider`]
//! trait so the dispatch orchestrator can run against a fake in tests. API
//! keys are workspace-scoped and passed per call rather than baked into the
//! client, which lets one pooled [`reqwest::Client`] serve every workspace.

pub mod client;
pub mod provider;
pub mod ramp;
pub mod types;
