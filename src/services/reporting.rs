//! Reporting over a benefit list
//!
//! Summary counts, savings breakdown, recommendations, filtering and the
//! export document. All functions are pure over the list they are given.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{
    Benefit, BenefitCategory, BenefitReport, BenefitSummary, BenefitsView, Capability,
    SavingsBreakdown, SavingsItem,
};
use crate::services::rates::RateLookup;

/// Number of recommendations returned by default
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// Status filter for benefit lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Active,
    Unused,
}

impl StatusFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(StatusFilter::Active),
            "unused" => Some(StatusFilter::Unused),
            _ => None,
        }
    }
}

/// Combined category and status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BenefitFilter {
    pub category: Option<BenefitCategory>,
    pub status: Option<StatusFilter>,
}

impl BenefitFilter {
    pub fn matches(&self, benefit: &Benefit) -> bool {
        let category_ok = self
            .category
            .map(|c| benefit.matches_category(c))
            .unwrap_or(true);
        let status_ok = match self.status {
            Some(StatusFilter::Active) => benefit.is_active,
            Some(StatusFilter::Unused) => !benefit.is_active,
            None => true,
        };
        category_ok && status_ok
    }

    /// Matching benefits, list order preserved
    pub fn apply(&self, benefits: &[Benefit]) -> Vec<Benefit> {
        benefits
            .iter()
            .filter(|b| self.matches(b))
            .cloned()
            .collect()
    }
}

/// Headline counts and potential savings
pub fn summarize(benefits: &[Benefit]) -> BenefitSummary {
    let active = benefits.iter().filter(|b| b.is_active).count();
    let potential_savings = benefits
        .iter()
        .filter(|b| !b.is_active)
        .map(|b| b.estimated_value)
        .sum();

    BenefitSummary {
        total: benefits.len(),
        active,
        unused: benefits.len() - active,
        potential_savings,
    }
}

/// Savings lines for unused benefits with a positive value
///
/// Capability benefits report their unconfigured server count and the rate
/// in effect; catalog entries report zero for both.
pub fn savings_breakdown(benefits: &[Benefit], rates: &dyn RateLookup) -> SavingsBreakdown {
    let items: Vec<SavingsItem> = benefits
        .iter()
        .filter(|b| !b.is_active && b.estimated_value > 0.0)
        .map(|b| {
            let unconfigured = b.unconfigured_servers.len();
            let rate = match b.id.parse::<Capability>() {
                Ok(capability) if unconfigured > 0 => rates.rate(capability),
                _ => 0.0,
            };
            SavingsItem {
                id: b.id.clone(),
                name: b.name.clone(),
                unconfigured,
                rate,
                value: b.estimated_value,
            }
        })
        .collect();

    let total = items.iter().map(|i| i.value).sum();
    SavingsBreakdown { items, total }
}

/// Unused benefits by estimated value, highest first
///
/// Ties keep list order.
pub fn recommendations(benefits: &[Benefit], limit: usize) -> Vec<Benefit> {
    let mut unused: Vec<&Benefit> = benefits.iter().filter(|b| !b.is_active).collect();
    unused.sort_by(|a, b| b.estimated_value.total_cmp(&a.estimated_value));
    unused.into_iter().take(limit).cloned().collect()
}

/// Export document for a benefit view
pub fn export_report(view: &BenefitsView, generated_date: DateTime<Utc>) -> BenefitReport {
    BenefitReport {
        generated_date,
        data_source: view.data_source,
        summary: summarize(&view.benefits),
        benefits: view.benefits.clone(),
    }
}
