//! License SKU and subscription data models

use serde::{Deserialize, Serialize};

/// Prepaid unit counts for a SKU
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaidUnits {
    #[serde(default)]
    pub enabled: u64,
    #[serde(default)]
    pub suspended: u64,
    #[serde(default)]
    pub warning: u64,
}

/// A subscribed license SKU (Microsoft Graph `subscribedSkus`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSku {
    pub sku_id: String,
    #[serde(default)]
    pub sku_part_number: String,
    #[serde(default)]
    pub consumed_units: u64,
    #[serde(default)]
    pub prepaid_units: Option<PrepaidUnits>,
}

impl LicenseSku {
    /// Enabled prepaid units, 0 when unknown
    pub fn total_units(&self) -> u64 {
        self.prepaid_units.as_ref().map(|p| p.enabled).unwrap_or(0)
    }

    /// Windows-family SKU (part number contains uppercase `WIN`)
    pub fn is_windows(&self) -> bool {
        self.sku_part_number.contains("WIN")
    }
}

/// An Azure subscription visible to the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub state: Option<String>,
}
