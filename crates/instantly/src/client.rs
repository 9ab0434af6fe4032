//! REST client for the Instantly v2 HTTP endpoints.

use serde::Deserialize;

use crate::types::{
    BulkAddLeads, BulkAddOutcome, CreateCampaign, CreatedCampaign, SendingAccount,
};

/// Timezone stamped on the default campaign schedule.
const SCHEDULE_TIMEZONE: &str = "America/Chicago";

/// HTTP client for the Instantly API.
///
/// One instance serves every workspace; the workspace-scoped API key travels
/// with each call so the underlying connection pool is shared.
pub struct InstantlyClient {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the Instantly REST layer.
#[derive(Debug, thiserror::Error)]
pub enum InstantlyError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Instantly returned a non-2xx status code.
    #[error("Instantly API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A success response was missing a field the dispatch flow requires.
    #[error("Instantly response missing field: {0}")]
    MissingField(&'static str),
}

/// Paged listing envelope used by the v2 collection endpoints.
#[derive(Debug, Deserialize)]
struct ListPage<T> {
    #[serde(default)]
    items: Vec<T>,
}

/// Response from `POST /campaigns`.
#[derive(Debug, Deserialize)]
struct CreateCampaignResponse {
    id: Option<String>,
}

impl InstantlyClient {
    /// Create a new client against the given base URL (no trailing slash),
    /// e.g. `https://api.instantly.ai/api/v2`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// List the workspace's sending accounts.
    ///
    /// Sends `GET /accounts`. A single page is enough here: workspaces in
    /// this product attach a handful of sending accounts, not hundreds.
    pub async fn list_accounts(&self, api_key: &str) -> Result<Vec<SendingAccount>, InstantlyError> {
        let response = self
            .client
            .get(format!("{}/accounts", self.base_url))
            .query(&[("limit", "100")])
            .bearer_auth(api_key)
            .send()
            .await?;

        let page: ListPage<SendingAccount> = Self::parse_response(response).await?;
        Ok(page.items)
    }

    /// Set one sending account's daily send cap.
    ///
    /// Sends `PATCH /accounts/{email}`.
    pub async fn update_account_daily_limit(
        &self,
        api_key: &str,
        email: &str,
        daily_limit: i64,
    ) -> Result<(), InstantlyError> {
        let body = serde_json::json!({ "daily_limit": daily_limit });

        let response = self
            .client
            .patch(format!("{}/accounts/{}", self.base_url, email))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Create a campaign with its full step sequence.
    ///
    /// Sends `POST /campaigns`. The schedule is a fixed weekday window; the
    /// interesting parts are the placeholder steps and the delay unit.
    pub async fn create_campaign(
        &self,
        api_key: &str,
        campaign: &CreateCampaign,
    ) -> Result<CreatedCampaign, InstantlyError> {
        let body = serde_json::json!({
            "name": campaign.name,
            "delay_unit": campaign.delay_unit,
            "sequence_steps": campaign.steps,
            "campaign_schedule": {
                "schedules": [{
                    "name": "Default",
                    "timing": { "from": "09:00", "to": "17:00" },
                    "days": { "1": true, "2": true, "3": true, "4": true, "5": true },
                    "timezone": SCHEDULE_TIMEZONE,
                }],
            },
        });

        let response = self
            .client
            .post(format!("{}/campaigns", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let created: CreateCampaignResponse = Self::parse_response(response).await?;
        match created.id {
            Some(id) if !id.is_empty() => Ok(CreatedCampaign { id }),
            _ => Err(InstantlyError::MissingField("id")),
        }
    }

    /// Declare the custom-variable names a campaign's templates reference.
    ///
    /// Sends `POST /campaigns/{id}/custom-variables`.
    pub async fn add_campaign_variables(
        &self,
        api_key: &str,
        campaign_id: &str,
        variables: &[String],
    ) -> Result<(), InstantlyError> {
        let body = serde_json::json!({ "variables": variables });

        let response = self
            .client
            .post(format!(
                "{}/campaigns/{}/custom-variables",
                self.base_url, campaign_id
            ))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Upload a batch of leads into a campaign.
    ///
    /// Sends `POST /campaigns/{id}/leads` and returns the provider's upload
    /// accounting (uploaded / duplicate / blocklisted counts).
    pub async fn bulk_add_leads(
        &self,
        api_key: &str,
        campaign_id: &str,
        upload: &BulkAddLeads,
    ) -> Result<BulkAddOutcome, InstantlyError> {
        let body = serde_json::json!({
            "leads": upload.leads,
            "verify_leads_on_import": upload.verify_leads_on_import,
        });

        let response = self
            .client
            .post(format!("{}/campaigns/{}/leads", self.base_url, campaign_id))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Activate a campaign. Irreversible from this side; there is no
    /// compensating "deactivate" in the dispatch flow.
    ///
    /// Sends `POST /campaigns/{id}/activate`.
    pub async fn activate_campaign(
        &self,
        api_key: &str,
        campaign_id: &str,
    ) -> Result<(), InstantlyError> {
        let response = self
            .client
            .post(format!(
                "{}/campaigns/{}/activate",
                self.base_url, campaign_id
            ))
            .bearer_auth(api_key)
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`InstantlyError::ApiError`] with the
    /// status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, InstantlyError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(InstantlyError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, InstantlyError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), InstantlyError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
