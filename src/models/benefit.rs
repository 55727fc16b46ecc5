//! Benefit data model
//!
//! A benefit is the externally reported unit: one capability's (or one
//! license's) adoption status, gap count and estimated annual value. The
//! same shape is used for live computed records and for the static catalog.

use serde::{Deserialize, Serialize};

/// Benefit category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BenefitCategory {
    Security,
    Free,
    #[default]
    Deployment,
    Support,
    Training,
    Licensing,
    #[serde(other)]
    Other,
}

impl BenefitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BenefitCategory::Security => "security",
            BenefitCategory::Free => "free",
            BenefitCategory::Deployment => "deployment",
            BenefitCategory::Support => "support",
            BenefitCategory::Training => "training",
            BenefitCategory::Licensing => "licensing",
            BenefitCategory::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "security" => Some(BenefitCategory::Security),
            "free" => Some(BenefitCategory::Free),
            "deployment" => Some(BenefitCategory::Deployment),
            "support" => Some(BenefitCategory::Support),
            "training" => Some(BenefitCategory::Training),
            "licensing" => Some(BenefitCategory::Licensing),
            "other" => Some(BenefitCategory::Other),
            _ => None,
        }
    }
}

/// Adoption counts for a benefit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Usage {
    /// Machines (or licenses) with the benefit in use
    pub active: u64,
    /// Size of the eligible population
    pub total: u64,
    /// `active / total` as a rounded percentage, 0 when `total` is 0
    pub percentage: u8,
}

impl Usage {
    pub fn new(active: u64, total: u64) -> Self {
        Self {
            active,
            total,
            percentage: percentage(active, total),
        }
    }
}

/// Rounded percentage, guarded against an empty denominator
pub fn percentage(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (part as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// A benefit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    /// Stable key (`arc-001`, `license-{sku}`, or a catalog key)
    pub id: String,

    pub name: String,

    pub description: String,

    #[serde(default)]
    pub category: BenefitCategory,

    #[serde(default)]
    pub is_free: bool,

    /// At least one machine has the benefit configured
    #[serde(default)]
    pub is_active: bool,

    /// Estimated annual value of closing the gap
    #[serde(default)]
    pub estimated_value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    /// Machines missing the capability, evaluation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unconfigured_servers: Vec<String>,

    /// Machines with the capability, evaluation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configured_servers: Vec<String>,
}

impl Benefit {
    /// Whether the benefit matches a category filter
    ///
    /// The `free` filter also selects any free-tier benefit regardless of
    /// its category tag.
    pub fn matches_category(&self, category: BenefitCategory) -> bool {
        self.category == category || (category == BenefitCategory::Free && self.is_free)
    }
}
