//! Benefit computation pipeline
//!
//! Normalize, group, classify, aggregate, value and merge. The whole run is
//! synchronous over an in-memory snapshot and deterministic for identical
//! inputs.

use tracing::info;

use crate::models::{Benefit, Extension, Machine, PolicyAssignmentSummary};
use crate::services::aggregation::aggregate;
use crate::services::classification::ClassificationService;
use crate::services::grouping::GroupingIndex;
use crate::services::merge::merge;
use crate::services::rates::{RateLookup, RateTable};
use crate::services::valuation::to_benefit;

/// Compute capability benefits and merge them with the fallback catalog
///
/// Default rates apply when `rates` is `None`; with no fallback only the
/// computed benefits are returned.
pub fn compute_benefits(
    machines: &[Machine],
    extensions: &[Extension],
    assignments: &[PolicyAssignmentSummary],
    rates: Option<&dyn RateLookup>,
    fallback: Option<&[Benefit]>,
) -> Vec<Benefit> {
    let live = capability_benefits(machines, extensions, assignments, rates);
    match fallback {
        Some(catalog) => merge(live, catalog),
        None => live,
    }
}

/// Capability benefits only, standard rule order
pub fn capability_benefits(
    machines: &[Machine],
    extensions: &[Extension],
    assignments: &[PolicyAssignmentSummary],
    rates: Option<&dyn RateLookup>,
) -> Vec<Benefit> {
    let defaults = RateTable::default();
    let rates: &dyn RateLookup = match rates {
        Some(r) => r,
        None => &defaults,
    };
    let classifier = ClassificationService::default();

    let index = GroupingIndex::build(extensions, assignments);
    let aggregates = aggregate(&classifier, machines, &index);

    let benefits: Vec<Benefit> = aggregates
        .iter()
        .zip(classifier.rules())
        .filter_map(|(agg, rule)| to_benefit(agg, rule, rates))
        .collect();

    info!(
        "Benefit run: {} machines, {} extensions ({} skipped), {} assignment summaries ({} skipped, {} duplicate), {} benefits",
        machines.len(),
        extensions.len(),
        index.skipped_extensions(),
        assignments.len(),
        index.skipped_assignments(),
        index.duplicate_assignments(),
        benefits.len()
    );

    benefits
}
