//! Microsoft Graph license client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::AzureConfig;
use crate::models::LicenseSku;
use crate::services::providers::LicenseProvider;
use crate::services::resource_graph::handle_response;
use crate::utils::BenefitError;

#[derive(Debug, Deserialize)]
struct SkuList {
    #[serde(default)]
    value: Vec<LicenseSku>,
}

/// Reads subscribed SKUs for the tenant
#[derive(Clone)]
pub struct GraphLicenseClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GraphLicenseClient {
    /// Create a client, `None` when no Graph token is configured
    pub fn from_config(config: &AzureConfig) -> Result<Option<Self>, BenefitError> {
        let Some(token) = config.graph_token.clone().filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            base_url: config.graph_url.trim_end_matches('/').to_string(),
            token,
        }))
    }
}

#[async_trait]
impl LicenseProvider for GraphLicenseClient {
    async fn licenses(&self) -> Result<Vec<LicenseSku>, BenefitError> {
        let url = format!("{}/v1.0/subscribedSkus", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let parsed: SkuList = handle_response(response, "licenses").await?;
        Ok(parsed.value)
    }
}
