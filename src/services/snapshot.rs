//! Offline inventory snapshots
//!
//! A snapshot directory holds the same record shapes the live queries
//! return: `machines.json`, `extensions.json`, `assignments.json` and, when
//! present, `licenses.json` and `subscriptions.json`. Each file is either a
//! bare array or a saved API response (`{"data": [...]}` from Resource Graph,
//! `{"value": [...]}` from ARM or Graph).

use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::models::{Extension, LicenseSku, Machine, PolicyAssignmentSummary, Subscription};
use crate::services::providers::{
    ExtensionProvider, InventoryProvider, LicenseProvider, PolicyAssignmentProvider,
    SubscriptionProvider,
};
use crate::utils::BenefitError;

pub const MACHINES_FILE: &str = "machines.json";
pub const EXTENSIONS_FILE: &str = "extensions.json";
pub const ASSIGNMENTS_FILE: &str = "assignments.json";
pub const LICENSES_FILE: &str = "licenses.json";
pub const SUBSCRIPTIONS_FILE: &str = "subscriptions.json";

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile<T> {
    Bare(Vec<T>),
    Graph { data: Vec<T> },
    List { value: Vec<T> },
}

impl<T> RecordFile<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            RecordFile::Bare(v) => v,
            RecordFile::Graph { data } => data,
            RecordFile::List { value } => value,
        }
    }
}

/// Reads inventory records from a snapshot directory
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    dir: PathBuf,
}

impl SnapshotProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Whether an optional file exists in the snapshot
    pub fn has(&self, file: &str) -> bool {
        self.dir.join(file).is_file()
    }

    async fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, BenefitError> {
        let path = self.dir.join(file);
        let source = format!("snapshot {}", path.display());

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| BenefitError::fetch(&source, e.to_string()))?;
        let parsed: RecordFile<T> = serde_json::from_str(&raw)
            .map_err(|e| BenefitError::fetch(&source, e.to_string()))?;
        let records = parsed.into_records();

        debug!("Read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    async fn read_optional<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, BenefitError> {
        if self.has(file) {
            self.read(file).await
        } else {
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl InventoryProvider for SnapshotProvider {
    async fn machines(&self, _subscriptions: &[String]) -> Result<Vec<Machine>, BenefitError> {
        self.read(MACHINES_FILE).await
    }
}

#[async_trait]
impl ExtensionProvider for SnapshotProvider {
    async fn extensions(&self, _subscriptions: &[String]) -> Result<Vec<Extension>, BenefitError> {
        self.read_optional(EXTENSIONS_FILE).await
    }
}

#[async_trait]
impl PolicyAssignmentProvider for SnapshotProvider {
    async fn assignments(
        &self,
        _subscriptions: &[String],
    ) -> Result<Vec<PolicyAssignmentSummary>, BenefitError> {
        self.read_optional(ASSIGNMENTS_FILE).await
    }
}

#[async_trait]
impl LicenseProvider for SnapshotProvider {
    async fn licenses(&self) -> Result<Vec<LicenseSku>, BenefitError> {
        self.read_optional(LICENSES_FILE).await
    }
}

#[async_trait]
impl SubscriptionProvider for SnapshotProvider {
    async fn subscriptions(&self) -> Result<Vec<Subscription>, BenefitError> {
        self.read_optional(SUBSCRIPTIONS_FILE).await
    }
}
