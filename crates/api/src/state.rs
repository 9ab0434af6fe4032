use std::sync::Arc;

use outflow_instantly::provider::CampaignProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: outflow_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Email-sending provider. The production binary wires in the Instantly
    /// client; integration tests substitute a recording fake.
    pub provider: Arc<dyn CampaignProvider>,
}
