//! Provider abstraction over the Instantly client.
//!
//! The dispatch orchestrator talks to [`CampaignProvider`] instead of the
//! concrete client so flow tests can record calls without touching the
//! network. [`InstantlyClient`] is the production implementation; the
//! methods mirror it one to one.

use async_trait::async_trait;

use crate::client::{InstantlyClient, InstantlyError};
use crate::types::{
    BulkAddLeads, BulkAddOutcome, CreateCampaign, CreatedCampaign, SendingAccount,
};

#[async_trait]
pub trait CampaignProvider: Send + Sync {
    async fn list_accounts(&self, api_key: &str) -> Result<Vec<SendingAccount>, InstantlyError>;

    async fn update_account_daily_limit(
        &self,
        api_key: &str,
        email: &str,
        daily_limit: i64,
    ) -> Result<(), InstantlyError>;

    async fn create_campaign(
        &self,
        api_key: &str,
        campaign: &CreateCampaign,
    ) -> Result<CreatedCampaign, InstantlyError>;

    async fn add_campaign_variables(
        &self,
        api_key: &str,
        campaign_id: &str,
        variables: &[String],
    ) -> Result<(), InstantlyError>;

    async fn bulk_add_leads(
        &self,
        api_key: &str,
        campaign_id: &str,
        upload: &BulkAddLeads,
    ) -> Result<BulkAddOutcome, InstantlyError>;

    async fn activate_campaign(
        &self,
        api_key: &str,
        campaign_id: &str,
    ) -> Result<(), InstantlyError>;
}

#[async_trait]
impl CampaignProvider for InstantlyClient {
    async fn list_accounts(&self, api_key: &str) -> Result<Vec<SendingAccount>, InstantlyError> {
        InstantlyClient::list_accounts(self, api_key).await
    }

    async fn update_account_daily_limit(
        &self,
        api_key: &str,
        email: &str,
        daily_limit: i64,
    ) -> Result<(), InstantlyError> {
        InstantlyClient::update_account_daily_limit(self, api_key, email, daily_limit).await
    }

    async fn create_campaign(
        &self,
        api_key: &str,
        campaign: &CreateCampaign,
    ) -> Result<CreatedCampaign, InstantlyError> {
        InstantlyClient::create_campaign(self, api_key, campaign).await
    }

    async fn add_campaign_variables(
        &self,
        api_key: &str,
        campaign_id: &str,
        variables: &[String],
    ) -> Result<(), InstantlyError> {
        InstantlyClient::add_campaign_variables(self, api_key, campaign_id, variables).await
    }

    async fn bulk_add_leads(
        &self,
        api_key: &str,
        campaign_id: &str,
        upload: &BulkAddLeads,
    ) -> Result<BulkAddOutcome, InstantlyError> {
        InstantlyClient::bulk_add_leads(self, api_key, campaign_id, upload).await
    }

    async fn activate_campaign(
        &self,
        api_key: &str,
        campaign_id: &str,
    ) -> Result<(), InstantlyError> {
        InstantlyClient::activate_campaign(self, api_key, campaign_id).await
    }
}
