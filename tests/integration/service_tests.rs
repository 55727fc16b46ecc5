//! Benefit service tests
//!
//! Builds the service from configuration over snapshot directories and
//! checks degradation when sources fail.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;

use arc_benefits::config::{AppConfig, SnapshotConfig};
use arc_benefits::models::DataSource;
use arc_benefits::services::{BenefitCatalog, BenefitService, RateTable, SourceKind};

use crate::common::{InventoryFixture, MockError, MockInventory};

/// Write a snapshot directory under the system temp dir
fn snapshot_dir(name: &str, files: &[(&str, serde_json::Value)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "arc_benefits_service_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    for (file, contents) in files {
        std::fs::write(dir.join(file), contents.to_string()).unwrap();
    }
    dir
}

fn snapshot_config(dir: PathBuf) -> AppConfig {
    AppConfig {
        snapshot: Some(SnapshotConfig { dir }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_snapshot_service_from_config() {
    let dir = snapshot_dir(
        "basic",
        &[
            (
                "machines.json",
                json!([
                    { "name": "web-01", "updateManagerEnabled": true, "tags": { "env": "prod" } },
                    { "name": "web-02" }
                ]),
            ),
            (
                "extensions.json",
                json!({ "data": [{ "machineName": "web-02", "extensionType": "ChangeTracking-Windows" }] }),
            ),
        ],
    );
    let mut config = snapshot_config(dir.clone());
    config.rates.overrides.insert("arc-001".to_string(), json!(1000.0));

    let service = BenefitService::from_config(&config).unwrap();
    assert_eq!(service.source_kind(), SourceKind::Snapshot);
    assert!(service.is_live());

    let view = service.current_benefits().await;
    assert_eq!(view.data_source, DataSource::Azure);

    let update = view.benefits.iter().find(|b| b.id == "arc-001").unwrap();
    assert_eq!(update.estimated_value, 1000.0);
    let tracking = view.benefits.iter().find(|b| b.id == "arc-002").unwrap();
    assert_eq!(tracking.configured_servers, vec!["web-02"]);
    let tagging = view.benefits.iter().find(|b| b.id == "arc-009").unwrap();
    assert_eq!(tagging.configured_servers, vec!["web-01"]);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_snapshot_missing_machines_degrades_to_catalog() {
    let dir = snapshot_dir("empty", &[]);
    let service = BenefitService::from_config(&snapshot_config(dir.clone())).unwrap();

    assert!(service.compute_live().await.is_err());
    let view = service.current_benefits().await;
    assert_eq!(view.data_source, DataSource::Sample);
    assert_eq!(view.benefits.len(), service.catalog().len());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_catalog_disabled_serves_live_only() {
    let dir = snapshot_dir(
        "no_catalog",
        &[("machines.json", json!([{ "name": "web-01" }]))],
    );
    let mut config = snapshot_config(dir.clone());
    config.catalog.enabled = false;

    let service = BenefitService::from_config(&config).unwrap();
    let view = service.current_benefits().await;

    assert_eq!(view.benefits.len(), 9);
    assert!(view.benefits.iter().all(|b| b.id.starts_with("arc-")));

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_default_config_has_no_live_source() {
    let service = BenefitService::from_config(&AppConfig::default()).unwrap();

    assert_eq!(service.source_kind(), SourceKind::None);
    assert_eq!(service.current_benefits().await.data_source, DataSource::Sample);
}

#[tokio::test]
async fn test_partial_source_failure_aborts_run() {
    let fixture = InventoryFixture::mixed();
    let mock = MockInventory::new();
    mock.add_machines(fixture.machines);
    mock.set_error_mode(MockError::ExtensionsUnavailable);
    let mock = Arc::new(mock);

    let service = BenefitService::new(
        Some(mock.data_sources()),
        RateTable::default(),
        BenefitCatalog::bundled().unwrap(),
    );

    let err = service.compute_live().await.unwrap_err();
    assert!(err.to_string().contains("extensions"));
    assert_eq!(service.refresh().await.data_source, DataSource::Sample);
}

#[tokio::test]
async fn test_discovery_scopes_inventory() {
    let mock = Arc::new(MockInventory::new());
    mock.add_machines(InventoryFixture::mixed().machines);

    let service = BenefitService::new(
        Some(mock.discovering_sources()),
        RateTable::default(),
        BenefitCatalog::bundled().unwrap(),
    );

    // nothing discovered: inventory is not queried
    assert_eq!(service.refresh().await.data_source, DataSource::Sample);
    assert_eq!(mock.machine_calls(), 0);

    mock.add_subscription("6f1c2a3b-0000-4abc-9def-123456789abc");
    assert_eq!(service.refresh().await.data_source, DataSource::Azure);
    assert_eq!(mock.machine_calls(), 1);
}
