#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use outflow_api::config::ServerConfig;
use outflow_api::router::build_app_router;
use outflow_api::state::AppState;
use outflow_instantly::client::InstantlyError;
use outflow_instantly::provider::CampaignProvider;
use outflow_instantly::types::{
    BulkAddLeads, BulkAddOutcome, CampaignStep, CreateCampaign, CreatedCampaign, DelayUnit,
    ProviderLead, SendingAccount,
};

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
///
/// No API key (auth disabled) and a base URL that would fail fast if any
/// test ever reached a real HTTP client.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        api_key: None,
        instantly_base_url: "http://instantly.invalid".to_string(),
    }
}

/// Build the production router over the given pool with a fresh recording
/// provider nobody inspects.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), Arc::new(RecordingProvider::new()))
}

/// Build the production router with a caller-held provider so tests can
/// assert on recorded calls afterwards.
pub fn build_test_app_with_provider(pool: PgPool, provider: Arc<RecordingProvider>) -> Router {
    build_test_app_with(pool, test_config(), provider)
}

/// Full control variant; used by the auth tests to set an API key.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    provider: Arc<dyn CampaignProvider>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        provider,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PATCH, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Recording provider
// ---------------------------------------------------------------------------

/// One recorded provider call, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    ListAccounts,
    UpdateDailyLimit {
        email: String,
        daily_limit: i64,
    },
    CreateCampaign {
        name: String,
        delay_unit: DelayUnit,
        steps: Vec<CampaignStep>,
    },
    AddVariables {
        campaign_id: String,
        names: Vec<String>,
    },
    BulkAddLeads {
        campaign_id: String,
        leads: Vec<ProviderLead>,
        verify: bool,
    },
    Activate {
        campaign_id: String,
    },
}

/// In-memory [`CampaignProvider`] that records every call and hands out
/// sequential campaign ids (`prov-1`, `prov-2`, ...). Bulk uploads report
/// every lead as uploaded. Individual phases can be told to fail.
pub struct RecordingProvider {
    calls: Mutex<Vec<ProviderCall>>,
    next_id: AtomicUsize,
    pub accounts: Vec<SendingAccount>,
    pub fail_create: bool,
    pub fail_bulk_add: bool,
}

impl RecordingProvider {
    pub fn new() -> Self {
        RecordingProvider {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            accounts: Vec::new(),
            fail_create: false,
            fail_bulk_add: false,
        }
    }

    pub fn with_accounts(accounts: Vec<SendingAccount>) -> Self {
        RecordingProvider {
            accounts,
            ..RecordingProvider::new()
        }
    }

    pub fn failing_create() -> Self {
        RecordingProvider {
            fail_create: true,
            ..RecordingProvider::new()
        }
    }

    /// Snapshot of all recorded calls so far.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls concerning one provider campaign, in order.
    pub fn calls_for(&self, id: &str) -> Vec<ProviderCall> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                ProviderCall::AddVariables { campaign_id, .. }
                | ProviderCall::BulkAddLeads { campaign_id, .. }
                | ProviderCall::Activate { campaign_id } => campaign_id == id,
                _ => false,
            })
            .collect()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn api_error() -> InstantlyError {
        InstantlyError::ApiError {
            status: 500,
            body: "provider unavailable".to_string(),
        }
    }
}

#[async_trait]
impl CampaignProvider for RecordingProvider {
    async fn list_accounts(&self, _api_key: &str) -> Result<Vec<SendingAccount>, InstantlyError> {
        self.record(ProviderCall::ListAccounts);
        Ok(self.accounts.clone())
    }

    async fn update_account_daily_limit(
        &self,
        _api_key: &str,
        email: &str,
        daily_limit: i64,
    ) -> Result<(), InstantlyError> {
        self.record(ProviderCall::UpdateDailyLimit {
            email: email.to_string(),
            daily_limit,
        });
        Ok(())
    }

    async fn create_campaign(
        &self,
        _api_key: &str,
        campaign: &CreateCampaign,
    ) -> Result<CreatedCampaign, InstantlyError> {
        self.record(ProviderCall::CreateCampaign {
            name: campaign.name.clone(),
            delay_unit: campaign.delay_unit,
            steps: campaign.steps.clone(),
        });
        if self.fail_create {
            return Err(Self::api_error());
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(CreatedCampaign {
            id: format!("prov-{n}"),
        })
    }

    async fn add_campaign_variables(
        &self,
        _api_key: &str,
        campaign_id: &str,
        variables: &[String],
    ) -> Result<(), InstantlyError> {
        self.record(ProviderCall::AddVariables {
            campaign_id: campaign_id.to_string(),
            names: variables.to_vec(),
        });
        Ok(())
    }

    async fn bulk_add_leads(
        &self,
        _api_key: &str,
        campaign_id: &str,
        upload: &BulkAddLeads,
    ) -> Result<BulkAddOutcome, InstantlyError> {
        self.record(ProviderCall::BulkAddLeads {
            campaign_id: campaign_id.to_string(),
            leads: upload.leads.clone(),
            verify: upload.verify_leads_on_import,
        });
        if self.fail_bulk_add {
            return Err(Self::api_error());
        }
        Ok(BulkAddOutcome {
            leads_uploaded: upload.leads.len() as i64,
            duplicated_leads: 0,
            in_blocklist: 0,
        })
    }

    async fn activate_campaign(
        &self,
        _api_key: &str,
        campaign_id: &str,
    ) -> Result<(), InstantlyError> {
        self.record(ProviderCall::Activate {
            campaign_id: campaign_id.to_string(),
        });
        Ok(())
    }
}
