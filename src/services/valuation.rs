//! Valuation and benefit mapping

use crate::models::{Benefit, BenefitCategory, CapabilityAggregate, LicenseSku, Usage};
use crate::services::classification::CapabilityRule;
use crate::services::rates::RateLookup;

/// Map one aggregate to its benefit record
///
/// Returns `None` when the rule asks to be dropped for an empty eligible
/// subset.
pub fn to_benefit(
    aggregate: &CapabilityAggregate,
    rule: &CapabilityRule,
    rates: &dyn RateLookup,
) -> Option<Benefit> {
    let total = aggregate.total();
    if total == 0 && rule.omit_when_no_eligible {
        return None;
    }

    let rate = rates.rate(rule.capability);

    Some(Benefit {
        id: rule.capability.benefit_id().to_string(),
        name: rule.name.to_string(),
        description: rule.text.description(aggregate.disabled, total),
        category: rule.category,
        is_free: rule.is_free,
        is_active: aggregate.enabled > 0,
        estimated_value: aggregate.disabled as f64 * rate,
        details: Some(rule.text.details(aggregate.enabled, aggregate.disabled)),
        usage: Some(Usage::new(aggregate.enabled, total)),
        unconfigured_servers: aggregate.disabled_servers.clone(),
        configured_servers: aggregate.enabled_servers.clone(),
    })
}

/// Benefits for Windows license SKUs, input order
pub fn license_benefits(skus: &[LicenseSku]) -> Vec<Benefit> {
    skus.iter()
        .filter(|sku| sku.is_windows())
        .map(|sku| {
            let total = sku.total_units();
            Benefit {
                id: format!("license-{}", sku.sku_id),
                name: sku.sku_part_number.clone(),
                description: format!("{} of {} licenses in use", sku.consumed_units, total),
                category: BenefitCategory::Deployment,
                is_free: false,
                is_active: sku.consumed_units > 0,
                estimated_value: 0.0,
                details: Some(format!("License: {}", sku.sku_part_number)),
                usage: Some(Usage::new(sku.consumed_units, total)),
                unconfigured_servers: Vec::new(),
                configured_servers: Vec::new(),
            }
        })
        .collect()
}
