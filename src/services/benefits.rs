//! Benefit service
//!
//! Owns the injected data sources, the rate table and the fallback catalog,
//! and produces the current benefit view. A failed live run degrades to the
//! catalog rather than failing the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::models::{Benefit, BenefitsView, DataSource};
use crate::services::catalog::BenefitCatalog;
use crate::services::graph::GraphLicenseClient;
use crate::services::merge::merge;
use crate::services::pipeline::capability_benefits;
use crate::services::providers::{DataSources, LicenseProvider, SubscriptionProvider};
use crate::services::rates::RateTable;
use crate::services::resource_graph::ResourceGraphClient;
use crate::services::snapshot::{SnapshotProvider, LICENSES_FILE, SUBSCRIPTIONS_FILE};
use crate::services::valuation::license_benefits;
use crate::utils::BenefitError;

/// Kind of live source backing the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Azure,
    Snapshot,
    None,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Azure => "azure",
            SourceKind::Snapshot => "snapshot",
            SourceKind::None => "none",
        }
    }
}

#[derive(Debug, Clone)]
struct CachedView {
    view: BenefitsView,
    computed_at: Instant,
}

/// Computes and caches the current benefit view
pub struct BenefitService {
    sources: Option<DataSources>,
    source_kind: SourceKind,
    rates: RateTable,
    catalog: BenefitCatalog,
    cache_ttl: Option<Duration>,
    cached: RwLock<Option<CachedView>>,
}

impl BenefitService {
    /// Create a service over explicit collaborators
    pub fn new(sources: Option<DataSources>, rates: RateTable, catalog: BenefitCatalog) -> Self {
        let source_kind = if sources.is_some() {
            SourceKind::Azure
        } else {
            SourceKind::None
        };
        Self {
            sources,
            source_kind,
            rates,
            catalog,
            cache_ttl: None,
            cached: RwLock::new(None),
        }
    }

    /// Keep computed views for `ttl` before recomputing
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl).filter(|t| !t.is_zero());
        self
    }

    pub fn with_source_kind(mut self, kind: SourceKind) -> Self {
        self.source_kind = kind;
        self
    }

    /// Build the service and its collaborators from configuration
    ///
    /// A snapshot directory takes precedence over Azure credentials. With
    /// neither configured the service serves the catalog only.
    pub fn from_config(config: &AppConfig) -> Result<Self, BenefitError> {
        let rates = RateTable::from_config(&config.rates);
        let catalog = BenefitCatalog::from_config(&config.catalog);

        let (sources, kind) = if let Some(snapshot) = &config.snapshot {
            info!("Using inventory snapshot at {}", snapshot.dir.display());
            (Some(snapshot_sources(snapshot.dir.clone(), config)), SourceKind::Snapshot)
        } else if let Some(azure) = config.azure.as_ref().filter(|a| a.access_token.is_some()) {
            info!("Using Azure Resource Graph at {}", azure.management_url);
            let graph = Arc::new(ResourceGraphClient::new(azure)?);
            let licenses = GraphLicenseClient::from_config(azure)?
                .map(|c| Arc::new(c) as Arc<dyn LicenseProvider>);
            let sources = DataSources {
                inventory: graph.clone(),
                extensions: graph.clone(),
                assignments: graph.clone(),
                licenses,
                subscriptions: Some(graph as Arc<dyn SubscriptionProvider>),
                configured_subscriptions: azure.subscriptions.clone(),
            };
            (Some(sources), SourceKind::Azure)
        } else {
            info!("No live data source configured; serving the benefit catalog only");
            (None, SourceKind::None)
        };

        let mut service = Self::new(sources, rates, catalog).with_source_kind(kind);
        if config.cache.enabled {
            service = service.with_cache_ttl(Duration::from_secs(config.cache.ttl_secs));
        }
        Ok(service)
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn is_live(&self) -> bool {
        self.sources.is_some()
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn catalog(&self) -> &BenefitCatalog {
        &self.catalog
    }

    /// The catalog on its own
    pub fn sample_view(&self) -> BenefitsView {
        BenefitsView {
            data_source: DataSource::Sample,
            benefits: self.catalog.entries().to_vec(),
        }
    }

    /// Run the live pipeline, propagating collaborator failures
    pub async fn compute_live(&self) -> Result<BenefitsView, BenefitError> {
        let Some(sources) = &self.sources else {
            return Ok(self.sample_view());
        };

        let snapshot = sources.collect().await?;

        let mut live: Vec<Benefit> = match &snapshot.arc {
            Some(arc) => capability_benefits(
                &arc.machines,
                &arc.extensions,
                &arc.assignments,
                Some(&self.rates),
            ),
            None => Vec::new(),
        };
        live.extend(license_benefits(&snapshot.licenses));

        if live.is_empty() {
            info!("Live source returned no benefits; serving the catalog");
            return Ok(self.sample_view());
        }

        Ok(BenefitsView {
            data_source: DataSource::Azure,
            benefits: merge(live, self.catalog.entries()),
        })
    }

    /// Current view, served from cache when fresh
    ///
    /// A failed live run is logged and answered with the catalog.
    pub async fn current_benefits(&self) -> BenefitsView {
        if let Some(ttl) = self.cache_ttl {
            if let Some(cached) = self.cached.read().await.as_ref() {
                if cached.computed_at.elapsed() <= ttl {
                    debug!("Serving cached benefit view");
                    return cached.view.clone();
                }
            }
        }
        self.refresh().await
    }

    /// Recompute the view, bypassing the cache
    pub async fn refresh(&self) -> BenefitsView {
        let view = match self.compute_live().await {
            Ok(view) => view,
            Err(e) => {
                warn!("Live benefit computation failed, using catalog: {}", e);
                return self.sample_view();
            }
        };

        if self.cache_ttl.is_some() {
            *self.cached.write().await = Some(CachedView {
                view: view.clone(),
                computed_at: Instant::now(),
            });
        }
        view
    }

    /// Look up one benefit in the current view
    pub async fn benefit(&self, id: &str) -> Option<Benefit> {
        self.current_benefits()
            .await
            .benefits
            .into_iter()
            .find(|b| b.id == id)
    }
}

fn snapshot_sources(dir: std::path::PathBuf, config: &AppConfig) -> DataSources {
    let snapshot = Arc::new(SnapshotProvider::new(dir));
    let licenses = snapshot
        .has(LICENSES_FILE)
        .then(|| snapshot.clone() as Arc<dyn LicenseProvider>);
    let subscriptions = snapshot
        .has(SUBSCRIPTIONS_FILE)
        .then(|| snapshot.clone() as Arc<dyn SubscriptionProvider>);
    let configured = config
        .azure
        .as_ref()
        .map(|a| a.subscriptions.clone())
        .unwrap_or_default();

    DataSources {
        inventory: snapshot.clone(),
        extensions: snapshot.clone(),
        assignments: snapshot,
        licenses,
        subscriptions,
        configured_subscriptions: configured,
    }
}
