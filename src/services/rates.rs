//! Per-capability unit rates
//!
//! Defaults come from the standard rule table. Overrides are layered on top
//! from the configuration file map and then from an optional JSON override
//! file (`{"arc-001": 500, "monitoring": 150}`). Anything that fails to parse
//! is logged and ignored, so a rate table can always be built.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RatesConfig;
use crate::models::Capability;
use crate::services::classification::STANDARD_RULES;
use crate::utils::validation::validate_rate;
use crate::utils::BenefitError;

/// Rate lookup injected into the benefit mapper
pub trait RateLookup {
    /// Currency per disabled machine per year
    fn rate(&self, capability: Capability) -> f64;
}

/// Effective rate table
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<Capability, f64>,
}

/// Serialized view of one rate, used by the `/rates` endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    pub benefit_id: &'static str,
    pub capability: Capability,
    pub rate: f64,
    pub overridden: bool,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            rates: STANDARD_RULES
                .iter()
                .map(|r| (r.capability, r.default_rate))
                .collect(),
        }
    }
}

impl RateLookup for RateTable {
    fn rate(&self, capability: Capability) -> f64 {
        self.rates.get(&capability).copied().unwrap_or(0.0)
    }
}

impl RateTable {
    /// Build the table from configuration, never failing
    pub fn from_config(config: &RatesConfig) -> Self {
        let mut table = RateTable::default();

        let config_overrides = config
            .overrides
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<serde_json::Map<_, _>>();
        table.apply(&config_overrides, "rates.overrides");

        if let Some(path) = &config.file {
            match load_override_file(path) {
                Ok(map) => table.apply(&map, &path.display().to_string()),
                Err(e) => warn!("{}; using default rates for file overrides", e),
            }
        }

        table
    }

    /// Parse a JSON override document and layer it over the defaults
    ///
    /// On a parse failure the defaults are returned unchanged.
    pub fn from_json(raw: &str) -> Self {
        let mut table = RateTable::default();
        match parse_override_document(raw, "rate overrides") {
            Ok(map) => table.apply(&map, "rate overrides"),
            Err(e) => warn!("{}; using default rates", e),
        }
        table
    }

    /// Set a single rate
    pub fn set(&mut self, capability: Capability, rate: f64) {
        self.rates.insert(capability, rate);
    }

    /// Rates in catalog order, flagged when they differ from the default
    pub fn entries(&self) -> Vec<RateEntry> {
        STANDARD_RULES
            .iter()
            .map(|r| {
                let rate = self.rate(r.capability);
                RateEntry {
                    benefit_id: r.capability.benefit_id(),
                    capability: r.capability,
                    rate,
                    overridden: rate != r.default_rate,
                }
            })
            .collect()
    }

    /// Layer one override source over the table
    ///
    /// When a source names the same capability twice (`arc-001` and
    /// `update-management`), the benefit id key wins, then the smaller key.
    fn apply(&mut self, overrides: &serde_json::Map<String, serde_json::Value>, origin: &str) {
        let mut chosen: HashMap<Capability, (&str, f64)> = HashMap::new();

        for (key, value) in overrides {
            let capability = match key.parse::<Capability>() {
                Ok(c) => c,
                Err(e) => {
                    warn!("Ignoring rate override in {}: {}", origin, e);
                    continue;
                }
            };

            let rate = match value.as_f64() {
                Some(rate) if validate_rate(rate) => rate,
                _ => {
                    warn!(
                        "Ignoring invalid rate for {} in {}: {}",
                        capability, origin, value
                    );
                    continue;
                }
            };

            match chosen.get(&capability).map(|(kept, _)| *kept) {
                Some(kept) if !prefer_key(key, kept, capability) => {
                    warn!(
                        "Ignoring rate override {} in {}: {} is already set by {}",
                        key, origin, capability, kept
                    );
                }
                Some(kept) => {
                    warn!(
                        "Rate override {} in {} replaces {} for {}",
                        key, origin, kept, capability
                    );
                    chosen.insert(capability, (key.as_str(), rate));
                }
                None => {
                    chosen.insert(capability, (key.as_str(), rate));
                }
            }
        }

        for (capability, (key, rate)) in chosen {
            debug!("Rate override from {}: {} = {}", origin, key, rate);
            self.rates.insert(capability, rate);
        }
    }
}

fn prefer_key(candidate: &str, kept: &str, capability: Capability) -> bool {
    let benefit_id = capability.benefit_id();
    if candidate == benefit_id {
        return true;
    }
    kept != benefit_id && candidate < kept
}

fn load_override_file(
    path: &Path,
) -> Result<serde_json::Map<String, serde_json::Value>, BenefitError> {
    let origin = path.display().to_string();
    let raw = fs::read_to_string(path)
        .map_err(|e| BenefitError::config_parse(&origin, e.to_string()))?;
    parse_override_document(&raw, &origin)
}

fn parse_override_document(
    raw: &str,
    origin: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, BenefitError> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(BenefitError::config_parse(origin, "expected a JSON object")),
        Err(e) => Err(BenefitError::config_parse(origin, e.to_string())),
    }
}
