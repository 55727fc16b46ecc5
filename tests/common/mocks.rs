//! Mock data sources for testing
//!
//! Provides an in-memory inventory implementing every collaborator trait,
//! so the service can be exercised without Azure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use arc_benefits::models::{Extension, LicenseSku, Machine, PolicyAssignmentSummary, Subscription};
use arc_benefits::services::{
    DataSources, ExtensionProvider, InventoryProvider, LicenseProvider, PolicyAssignmentProvider,
    SubscriptionProvider,
};
use arc_benefits::utils::BenefitError;

/// Mock inventory source
pub struct MockInventory {
    machines: Arc<RwLock<Vec<Machine>>>,
    extensions: Arc<RwLock<Vec<Extension>>>,
    assignments: Arc<RwLock<Vec<PolicyAssignmentSummary>>>,
    licenses: Arc<RwLock<Vec<LicenseSku>>>,
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
    /// Simulate errors when set
    pub error_mode: Arc<RwLock<Option<MockError>>>,
    machine_calls: AtomicUsize,
}

/// Types of errors the mock can simulate
#[derive(Debug, Clone)]
pub enum MockError {
    /// Credentials rejected by the source
    Forbidden,
    /// Source did not answer in time
    Timeout,
    /// Only the extension query fails
    ExtensionsUnavailable,
}

impl Default for MockInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInventory {
    /// Create an empty mock inventory
    pub fn new() -> Self {
        Self {
            machines: Arc::new(RwLock::new(Vec::new())),
            extensions: Arc::new(RwLock::new(Vec::new())),
            assignments: Arc::new(RwLock::new(Vec::new())),
            licenses: Arc::new(RwLock::new(Vec::new())),
            subscriptions: Arc::new(RwLock::new(Vec::new())),
            error_mode: Arc::new(RwLock::new(None)),
            machine_calls: AtomicUsize::new(0),
        }
    }

    /// Set error mode to simulate failures
    pub fn set_error_mode(&self, error: MockError) {
        *self.error_mode.write().unwrap() = Some(error);
    }

    /// Clear error mode
    pub fn clear_error_mode(&self) {
        *self.error_mode.write().unwrap() = None;
    }

    fn check_error(&self, source: &str) -> Result<(), BenefitError> {
        match self.error_mode.read().unwrap().as_ref() {
            Some(MockError::Forbidden) => Err(BenefitError::fetch(source, "403 Forbidden")),
            Some(MockError::Timeout) => Err(BenefitError::fetch(source, "request timed out")),
            Some(MockError::ExtensionsUnavailable) if source == "extensions" => {
                Err(BenefitError::fetch(source, "503 Service Unavailable"))
            }
            _ => Ok(()),
        }
    }

    pub fn add_machine(&self, machine: Machine) {
        self.machines.write().unwrap().push(machine);
    }

    pub fn add_machines(&self, machines: impl IntoIterator<Item = Machine>) {
        self.machines.write().unwrap().extend(machines);
    }

    pub fn add_extension(&self, extension: Extension) {
        self.extensions.write().unwrap().push(extension);
    }

    pub fn add_assignment(&self, summary: PolicyAssignmentSummary) {
        self.assignments.write().unwrap().push(summary);
    }

    pub fn add_license(&self, sku: LicenseSku) {
        self.licenses.write().unwrap().push(sku);
    }

    pub fn add_subscription(&self, subscription_id: &str) {
        self.subscriptions.write().unwrap().push(Subscription {
            subscription_id: subscription_id.to_string(),
            ..Default::default()
        });
    }

    /// Number of machine queries served
    pub fn machine_calls(&self) -> usize {
        self.machine_calls.load(Ordering::SeqCst)
    }

    /// Sources backed entirely by this mock, unscoped
    pub fn data_sources(self: &Arc<Self>) -> DataSources {
        DataSources {
            inventory: self.clone(),
            extensions: self.clone(),
            assignments: self.clone(),
            licenses: Some(self.clone()),
            subscriptions: None,
            configured_subscriptions: Vec::new(),
        }
    }

    /// Sources that discover their scope through this mock
    pub fn discovering_sources(self: &Arc<Self>) -> DataSources {
        DataSources {
            subscriptions: Some(self.clone()),
            ..self.data_sources()
        }
    }
}

#[async_trait]
impl InventoryProvider for MockInventory {
    async fn machines(&self, _: &[String]) -> Result<Vec<Machine>, BenefitError> {
        self.machine_calls.fetch_add(1, Ordering::SeqCst);
        self.check_error("machines")?;
        Ok(self.machines.read().unwrap().clone())
    }
}

#[async_trait]
impl ExtensionProvider for MockInventory {
    async fn extensions(&self, _: &[String]) -> Result<Vec<Extension>, BenefitError> {
        self.check_error("extensions")?;
        Ok(self.extensions.read().unwrap().clone())
    }
}

#[async_trait]
impl PolicyAssignmentProvider for MockInventory {
    async fn assignments(&self, _: &[String]) -> Result<Vec<PolicyAssignmentSummary>, BenefitError> {
        self.check_error("assignments")?;
        Ok(self.assignments.read().unwrap().clone())
    }
}

#[async_trait]
impl LicenseProvider for MockInventory {
    async fn licenses(&self) -> Result<Vec<LicenseSku>, BenefitError> {
        self.check_error("licenses")?;
        Ok(self.licenses.read().unwrap().clone())
    }
}

#[async_trait]
impl SubscriptionProvider for MockInventory {
    async fn subscriptions(&self) -> Result<Vec<Subscription>, BenefitError> {
        self.check_error("subscriptions")?;
        Ok(self.subscriptions.read().unwrap().clone())
    }
}
