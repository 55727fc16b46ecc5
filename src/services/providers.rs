//! Data collaborator interfaces and snapshot collection
//!
//! Providers return raw records for a set of subscriptions. How they
//! authenticate, page or retry is their own concern; the pipeline only sees
//! the joined snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::models::{Extension, LicenseSku, Machine, PolicyAssignmentSummary, Subscription};
use crate::utils::BenefitError;

/// Source of machine records
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    async fn machines(&self, subscriptions: &[String]) -> Result<Vec<Machine>, BenefitError>;
}

/// Source of installed extension records
#[async_trait]
pub trait ExtensionProvider: Send + Sync {
    async fn extensions(&self, subscriptions: &[String]) -> Result<Vec<Extension>, BenefitError>;
}

/// Source of per-machine policy assignment summaries
#[async_trait]
pub trait PolicyAssignmentProvider: Send + Sync {
    async fn assignments(
        &self,
        subscriptions: &[String],
    ) -> Result<Vec<PolicyAssignmentSummary>, BenefitError>;
}

/// Source of tenant license SKUs
#[async_trait]
pub trait LicenseProvider: Send + Sync {
    async fn licenses(&self) -> Result<Vec<LicenseSku>, BenefitError>;
}

/// Source of the subscriptions visible to the caller
#[async_trait]
pub trait SubscriptionProvider: Send + Sync {
    async fn subscriptions(&self) -> Result<Vec<Subscription>, BenefitError>;
}

/// Records fetched for machines in scope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcInventory {
    pub machines: Vec<Machine>,
    pub extensions: Vec<Extension>,
    pub assignments: Vec<PolicyAssignmentSummary>,
}

/// Everything one benefit run needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySnapshot {
    /// Subscription ids the inventory was scoped to
    pub subscriptions: Vec<String>,
    /// `None` when no subscription was in scope and nothing was queried
    pub arc: Option<ArcInventory>,
    pub licenses: Vec<LicenseSku>,
}

/// The set of collaborators backing a live run
#[derive(Clone)]
pub struct DataSources {
    pub inventory: Arc<dyn InventoryProvider>,
    pub extensions: Arc<dyn ExtensionProvider>,
    pub assignments: Arc<dyn PolicyAssignmentProvider>,
    pub licenses: Option<Arc<dyn LicenseProvider>>,
    pub subscriptions: Option<Arc<dyn SubscriptionProvider>>,
    /// Fixed scope; discovered through `subscriptions` when empty
    pub configured_subscriptions: Vec<String>,
}

impl DataSources {
    /// Fetch a full snapshot
    ///
    /// License fetches run alongside subscription discovery and the machine,
    /// extension and assignment fetches. Any failure aborts the whole
    /// collection.
    pub async fn collect(&self) -> Result<InventorySnapshot, BenefitError> {
        let licenses = async {
            match &self.licenses {
                Some(provider) => provider.licenses().await,
                None => Ok(Vec::new()),
            }
        };

        let inventory = async {
            let Some(subscriptions) = self.resolve_scope().await? else {
                info!("No subscriptions in scope; skipping machine inventory");
                return Ok(None);
            };

            let (machines, extensions, assignments) = tokio::try_join!(
                self.inventory.machines(&subscriptions),
                self.extensions.extensions(&subscriptions),
                self.assignments.assignments(&subscriptions),
            )?;

            Ok::<_, BenefitError>(Some((
                subscriptions,
                ArcInventory {
                    machines,
                    extensions,
                    assignments,
                },
            )))
        };

        let (inventory, licenses) = tokio::try_join!(inventory, licenses)?;

        let Some((subscriptions, arc)) = inventory else {
            return Ok(InventorySnapshot {
                subscriptions: Vec::new(),
                arc: None,
                licenses,
            });
        };

        info!(
            "Collected {} machines, {} extensions, {} assignment summaries, {} license SKUs",
            arc.machines.len(),
            arc.extensions.len(),
            arc.assignments.len(),
            licenses.len()
        );

        Ok(InventorySnapshot {
            subscriptions,
            arc: Some(arc),
            licenses,
        })
    }

    /// Subscriptions to query, `None` when discovery found none
    async fn resolve_scope(&self) -> Result<Option<Vec<String>>, BenefitError> {
        if !self.configured_subscriptions.is_empty() {
            return Ok(Some(self.configured_subscriptions.clone()));
        }

        let Some(provider) = &self.subscriptions else {
            // unscoped sources (snapshots) ignore the subscription list
            return Ok(Some(Vec::new()));
        };

        let discovered: Vec<String> = provider
            .subscriptions()
            .await?
            .into_iter()
            .map(|s| s.subscription_id)
            .collect();
        debug!("Discovered {} subscriptions", discovered.len());

        if discovered.is_empty() {
            Ok(None)
        } else {
            Ok(Some(discovered))
        }
    }
}
