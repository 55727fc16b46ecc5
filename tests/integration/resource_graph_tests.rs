//! Azure client tests
//!
//! Runs the Resource Graph and Microsoft Graph clients against a mock HTTP
//! server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arc_benefits::config::AzureConfig;
use arc_benefits::services::{
    BenefitCatalog, BenefitService, DataSources, ExtensionProvider, GraphLicenseClient,
    InventoryProvider, LicenseProvider, PolicyAssignmentProvider, RateTable, ResourceGraphClient,
    SubscriptionProvider,
};
use arc_benefits::models::DataSource;
use arc_benefits::utils::BenefitError;

use std::sync::Arc;

use crate::common::fixtures::ids;

const RESOURCES_PATH: &str = "/providers/Microsoft.ResourceGraph/resources";

fn azure_config(server: &MockServer) -> AzureConfig {
    AzureConfig {
        management_url: server.uri(),
        graph_url: server.uri(),
        access_token: Some("arm-token".to_string()),
        graph_token: Some("graph-token".to_string()),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn machine_row(name: &str, update_manager: bool) -> serde_json::Value {
    json!({
        "id": format!(
            "/subscriptions/{}/resourceGroups/rg-arc/providers/Microsoft.HybridCompute/machines/{}",
            ids::SUBSCRIPTION_ID, name
        ),
        "name": name,
        "resourceGroup": "rg-arc",
        "osType": "windows",
        "osVersion": "10.0.20348.2113",
        "status": "Connected",
        "updateManagerEnabled": update_manager,
        "hasTags": false
    })
}

async fn mount_query(server: &MockServer, query_marker: &str, data: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(RESOURCES_PATH))
        .and(query_param("api-version", "2021-03-01"))
        .and(header("authorization", "Bearer arm-token"))
        .and(QueryContains(query_marker.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalRecords": data.as_array().map(|a| a.len()).unwrap_or(0),
            "count": data.as_array().map(|a| a.len()).unwrap_or(0),
            "resultTruncated": "false",
            "data": data
        })))
        .mount(server)
        .await;
}

/// Matches a Resource Graph request whose KQL mentions `self.0`
struct QueryContains(String);

impl wiremock::Match for QueryContains {
    fn matches(&self, request: &wiremock::Request) -> bool {
        serde_json::from_slice::<serde_json::Value>(&request.body)
            .ok()
            .and_then(|body| body["query"].as_str().map(|q| q.contains(&self.0)))
            .unwrap_or(false)
    }
}

#[tokio::test]
async fn test_machines_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESOURCES_PATH))
        .and(body_partial_json(json!({ "subscriptions": [ids::SUBSCRIPTION_ID] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [machine_row("web-01", true), machine_row("web-02", false)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ResourceGraphClient::new(&azure_config(&server)).unwrap();
    let machines = client
        .machines(&[ids::SUBSCRIPTION_ID.to_string()])
        .await
        .unwrap();

    assert_eq!(machines.len(), 2);
    assert_eq!(machines[0].name, "web-01");
    assert_eq!(machines[0].update_manager_enabled, Some(true));
    assert_eq!(machines[1].os_version(), "10.0.20348.2113");
}

#[tokio::test]
async fn test_extensions_and_assignments_queries() {
    let server = MockServer::start().await;
    mount_query(
        &server,
        "machines/extensions",
        json!([{
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.HybridCompute/machines/web-01/extensions/AzureMonitorWindowsAgent",
            "machineName": "web-01",
            "extensionName": "AzureMonitorWindowsAgent",
            "extensionType": "AzureMonitorWindowsAgent",
            "publisher": "Microsoft.Azure.Monitor"
        }]),
    )
    .await;
    mount_query(
        &server,
        "guestconfigurationassignments",
        json!([{ "machineName": "web-01", "assignmentCount": 2, "assignments": ["a", "b"] }]),
    )
    .await;

    let client = ResourceGraphClient::new(&azure_config(&server)).unwrap();

    let extensions = client.extensions(&[]).await.unwrap();
    assert_eq!(extensions.len(), 1);
    assert_eq!(extensions[0].publisher(), "Microsoft.Azure.Monitor");

    let summaries = client.assignments(&[]).await.unwrap();
    assert_eq!(summaries[0].assignment_count, 2);
    assert!(summaries[0].has_assignments());
}

#[tokio::test]
async fn test_subscription_discovery() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param("api-version", "2020-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "subscriptionId": ids::SUBSCRIPTION_ID,
                "displayName": "Production",
                "state": "Enabled"
            }]
        })))
        .mount(&server)
        .await;

    let client = ResourceGraphClient::new(&azure_config(&server)).unwrap();
    let subscriptions = client.subscriptions().await.unwrap();

    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].display_name, "Production");
}

#[tokio::test]
async fn test_forbidden_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESOURCES_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("AuthorizationFailed"))
        .mount(&server)
        .await;

    let client = ResourceGraphClient::new(&azure_config(&server)).unwrap();
    let err = client.machines(&[]).await.unwrap_err();

    match err {
        BenefitError::Fetch { source_name, message } => {
            assert_eq!(source_name, "resource graph");
            assert!(message.contains("403"));
            assert!(message.contains("AuthorizationFailed"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_body_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RESOURCES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = ResourceGraphClient::new(&azure_config(&server)).unwrap();
    let err = client.machines(&[]).await.unwrap_err();

    assert!(matches!(err, BenefitError::Fetch { .. }));
}

#[test]
fn test_client_requires_token() {
    let config = AzureConfig::default();
    assert!(ResourceGraphClient::new(&config).is_err());
    assert!(GraphLicenseClient::from_config(&config).unwrap().is_none());
}

#[tokio::test]
async fn test_graph_licenses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1.0/subscribedSkus"))
        .and(header("authorization", "Bearer graph-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "skuId": ids::WINDOWS_SKU_ID,
                "skuPartNumber": "WIN_SERVER_STANDARD",
                "consumedUnits": 4,
                "prepaidUnits": { "enabled": 8, "suspended": 0, "warning": 0 }
            }]
        })))
        .mount(&server)
        .await;

    let client = GraphLicenseClient::from_config(&azure_config(&server))
        .unwrap()
        .expect("graph token configured");
    let skus = client.licenses().await.unwrap();

    assert_eq!(skus.len(), 1);
    assert_eq!(skus[0].total_units(), 8);
    assert!(skus[0].is_windows());
}

#[tokio::test]
async fn test_service_over_resource_graph() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "subscriptionId": ids::SUBSCRIPTION_ID }]
        })))
        .mount(&server)
        .await;
    mount_query(
        &server,
        "hybridcompute/machines\"",
        json!([machine_row("web-01", true), machine_row("web-02", false)]),
    )
    .await;
    mount_query(&server, "machines/extensions", json!([])).await;
    mount_query(&server, "guestconfigurationassignments", json!([])).await;

    let config = azure_config(&server);
    let graph = Arc::new(ResourceGraphClient::new(&config).unwrap());
    let sources = DataSources {
        inventory: graph.clone(),
        extensions: graph.clone(),
        assignments: graph.clone(),
        licenses: None,
        subscriptions: Some(graph),
        configured_subscriptions: vec![],
    };
    let service = BenefitService::new(
        Some(sources),
        RateTable::default(),
        BenefitCatalog::bundled().unwrap(),
    );

    let view = service.compute_live().await.unwrap();
    assert_eq!(view.data_source, DataSource::Azure);
    let update = view.benefits.iter().find(|b| b.id == "arc-001").unwrap();
    assert_eq!(update.configured_servers, vec!["web-01"]);
    assert_eq!(update.unconfigured_servers, vec!["web-02"]);
}

#[tokio::test]
async fn test_no_discovered_subscriptions_serves_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&server)
        .await;
    // no machine query is expected
    Mock::given(method("POST"))
        .and(path(RESOURCES_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = azure_config(&server);
    let graph = Arc::new(ResourceGraphClient::new(&config).unwrap());
    let sources = DataSources {
        inventory: graph.clone(),
        extensions: graph.clone(),
        assignments: graph.clone(),
        licenses: None,
        subscriptions: Some(graph),
        configured_subscriptions: vec![],
    };
    let service = BenefitService::new(
        Some(sources),
        RateTable::default(),
        BenefitCatalog::bundled().unwrap(),
    );

    let view = service.compute_live().await.unwrap();
    assert_eq!(view.data_source, DataSource::Sample);
}
