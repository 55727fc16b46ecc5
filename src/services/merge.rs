//! Merge of live benefits with the static fallback catalog

use std::collections::HashSet;

use crate::models::Benefit;

/// Left-biased union keyed on benefit id
///
/// Every live benefit is kept in its computed order, followed by each
/// fallback entry whose id the live list does not already contain, in catalog
/// order. Records are never combined field by field.
pub fn merge(live: Vec<Benefit>, fallback: &[Benefit]) -> Vec<Benefit> {
    let seen: HashSet<String> = live.iter().map(|b| b.id.clone()).collect();
    let mut merged = live;
    merged.extend(
        fallback
            .iter()
            .filter(|b| !seen.contains(&b.id))
            .cloned(),
    );
    merged
}
