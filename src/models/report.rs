//! Benefit report models (summary, savings breakdown, export)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Benefit;

/// Where a benefit list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Computed from live (or snapshot) inventory, merged with the catalog
    Azure,
    /// Static catalog only
    #[default]
    Sample,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Azure => "azure",
            DataSource::Sample => "sample",
        }
    }
}

/// Headline counts over a benefit list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BenefitSummary {
    pub total: usize,
    pub active: usize,
    pub unused: usize,
    /// Sum of estimated value over unused benefits
    pub potential_savings: f64,
}

/// One line of the savings breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsItem {
    pub id: String,
    pub name: String,
    pub unconfigured: usize,
    /// Unit rate per server per year, 0 for catalog entries without a rate
    pub rate: f64,
    pub value: f64,
}

/// Savings breakdown over unused benefits with a positive value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SavingsBreakdown {
    pub items: Vec<SavingsItem>,
    pub total: f64,
}

/// A benefit list tagged with its data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitsView {
    pub data_source: DataSource,
    pub benefits: Vec<Benefit>,
}

/// Exported report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitReport {
    pub generated_date: DateTime<Utc>,
    pub data_source: DataSource,
    pub summary: BenefitSummary,
    pub benefits: Vec<Benefit>,
}

impl BenefitReport {
    /// Suggested download file name (`sa-benefits-report-YYYY-MM-DD.json`)
    pub fn file_name(&self) -> String {
        format!(
            "sa-benefits-report-{}.json",
            self.generated_date.format("%Y-%m-%d")
        )
    }
}
