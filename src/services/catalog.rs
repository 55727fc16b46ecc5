//! Static fallback benefit catalog

use std::fs;
use std::path::Path;

use tracing::{error, info, warn};

use crate::config::CatalogConfig;
use crate::models::Benefit;
use crate::utils::BenefitError;

/// Catalog shipped with the binary
const BUNDLED_CATALOG: &str = include_str!("../../data/benefits.json");

/// Ordered list of static benefits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenefitCatalog {
    entries: Vec<Benefit>,
}

impl BenefitCatalog {
    pub fn new(entries: Vec<Benefit>) -> Self {
        Self { entries }
    }

    /// Parse the bundled catalog
    pub fn bundled() -> Result<Self, BenefitError> {
        Self::parse(BUNDLED_CATALOG, "bundled catalog")
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self, BenefitError> {
        let origin = path.display().to_string();
        let raw = fs::read_to_string(path)
            .map_err(|e| BenefitError::config_parse(&origin, e.to_string()))?;
        Self::parse(&raw, &origin)
    }

    /// Resolve the catalog from configuration
    ///
    /// A configured file that cannot be read falls back to the bundled
    /// catalog; with `enabled: false` the catalog is empty.
    pub fn from_config(config: &CatalogConfig) -> Self {
        if !config.enabled {
            info!("Fallback catalog disabled");
            return Self::default();
        }

        if let Some(path) = &config.path {
            match Self::load(path) {
                Ok(catalog) => {
                    info!(
                        "Loaded {} catalog entries from {}",
                        catalog.len(),
                        path.display()
                    );
                    return catalog;
                }
                Err(e) => warn!("{}; using bundled catalog", e),
            }
        }

        match Self::bundled() {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("{}", e);
                Self::default()
            }
        }
    }

    fn parse(raw: &str, origin: &str) -> Result<Self, BenefitError> {
        serde_json::from_str::<Vec<Benefit>>(raw)
            .map(Self::new)
            .map_err(|e| BenefitError::config_parse(origin, e.to_string()))
    }

    pub fn entries(&self) -> &[Benefit] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
