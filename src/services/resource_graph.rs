//! Azure Resource Graph client
//!
//! Issues KQL queries against the Resource Graph and the subscription list of
//! the Resource Manager API. Tokens are acquired outside this crate and
//! passed in through configuration.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::AzureConfig;
use crate::models::{Extension, Machine, PolicyAssignmentSummary, Subscription};
use crate::services::providers::{
    ExtensionProvider, InventoryProvider, PolicyAssignmentProvider, SubscriptionProvider,
};
use crate::utils::BenefitError;

const RESOURCE_GRAPH_API_VERSION: &str = "2021-03-01";
const SUBSCRIPTIONS_API_VERSION: &str = "2020-01-01";

/// KQL for Arc machines and their precomputed flags
pub const MACHINES_QUERY: &str = r#"resources
| where type == "microsoft.hybridcompute/machines"
| extend
    updateManagerEnabled = isnotnull(properties.osProfile.windowsConfiguration.patchSettings.assessmentMode) or isnotnull(properties.osProfile.linuxConfiguration.patchSettings.assessmentMode),
    monitoringEnabled = isnotnull(properties.extensions) and array_length(properties.extensions) > 0,
    hasHotpatch = tobool(properties.osProfile.windowsConfiguration.patchSettings.enableHotpatching),
    osVersion = tostring(properties.osVersion),
    hasTags = isnotnull(tags) and tostring(tags) != "{}"
| project
    id,
    name,
    resourceGroup,
    location,
    osType = tostring(properties.osType),
    osVersion,
    status = tostring(properties.status),
    provisioningState = tostring(properties.provisioningState),
    updateManagerEnabled,
    monitoringEnabled,
    hasHotpatch,
    hasTags,
    tags,
    lastSeenTime = tostring(properties.lastStatusChange)
| order by name asc"#;

/// KQL for extensions installed on Arc machines
pub const EXTENSIONS_QUERY: &str = r#"resources
| where type == "microsoft.hybridcompute/machines/extensions"
| extend
    machineName = tostring(split(id, '/')[8]),
    extensionType = tostring(properties.type),
    publisher = tostring(properties.publisher),
    provisioningState = tostring(properties.provisioningState)
| project
    id,
    machineName,
    extensionName = name,
    extensionType,
    publisher,
    provisioningState,
    resourceGroup
| order by machineName asc"#;

/// KQL for guest configuration assignments summarized per machine
pub const ASSIGNMENTS_QUERY: &str = r#"guestconfigurationresources
| where type == "microsoft.guestconfiguration/guestconfigurationassignments"
| extend machineName = tolower(tostring(split(id, '/')[8]))
| project machineName, assignmentName = name
| summarize
    assignmentCount = count(),
    assignments = make_list(assignmentName)
    by machineName"#;

/// Resource Graph query request body
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    subscriptions: &'a [String],
}

/// Resource Graph query response (object array result format)
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// ARM list response
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// Resource Graph API client
#[derive(Clone)]
pub struct ResourceGraphClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ResourceGraphClient {
    /// Create a new client
    pub fn new(config: &AzureConfig) -> Result<Self, BenefitError> {
        let token = config
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                BenefitError::fetch("resource graph", "no management access token configured")
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.management_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Run a KQL query scoped to the given subscriptions
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        subscriptions: &[String],
    ) -> Result<Vec<T>, BenefitError> {
        let url = format!(
            "{}/providers/Microsoft.ResourceGraph/resources?api-version={}",
            self.base_url, RESOURCE_GRAPH_API_VERSION
        );
        debug!(
            "Resource Graph query over {} subscriptions",
            subscriptions.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&QueryRequest {
                query,
                subscriptions,
            })
            .send()
            .await?;

        let parsed: QueryResponse<T> = handle_response(response, "resource graph").await?;
        Ok(parsed.data)
    }
}

/// Parse a JSON response or turn it into a fetch error
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    source_name: &str,
) -> Result<T, BenefitError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            let truncated = if body.len() > 500 {
                format!("{}... (truncated)", truncate_at_char_boundary(&body, 500))
            } else {
                body
            };
            BenefitError::fetch(
                source_name,
                format!("failed to parse response JSON: {}: {}", e, truncated),
            )
        })
    } else {
        let body = response.text().await.unwrap_or_default();
        error!("{} request failed with status {}", source_name, status);
        Err(BenefitError::fetch(
            source_name,
            format!("request failed with status {}: {}", status, body),
        ))
    }
}

fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[async_trait]
impl InventoryProvider for ResourceGraphClient {
    async fn machines(&self, subscriptions: &[String]) -> Result<Vec<Machine>, BenefitError> {
        self.query(MACHINES_QUERY, subscriptions).await
    }
}

#[async_trait]
impl ExtensionProvider for ResourceGraphClient {
    async fn extensions(&self, subscriptions: &[String]) -> Result<Vec<Extension>, BenefitError> {
        self.query(EXTENSIONS_QUERY, subscriptions).await
    }
}

#[async_trait]
impl PolicyAssignmentProvider for ResourceGraphClient {
    async fn assignments(
        &self,
        subscriptions: &[String],
    ) -> Result<Vec<PolicyAssignmentSummary>, BenefitError> {
        self.query(ASSIGNMENTS_QUERY, subscriptions).await
    }
}

#[async_trait]
impl SubscriptionProvider for ResourceGraphClient {
    async fn subscriptions(&self) -> Result<Vec<Subscription>, BenefitError> {
        let url = format!(
            "{}/subscriptions?api-version={}",
            self.base_url, SUBSCRIPTIONS_API_VERSION
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let parsed: ListResponse<Subscription> = handle_response(response, "subscriptions").await?;
        Ok(parsed.value)
    }
}
