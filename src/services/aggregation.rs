//! Aggregation of per-machine classifications into per-capability counts

use tracing::debug;

use crate::models::{CapabilityAggregate, Machine};
use crate::services::classification::{ClassificationService, MachineContext};
use crate::services::grouping::GroupingIndex;
use crate::services::identity;

/// Fold every machine through every rule
///
/// Machines are visited in input order, so member lists keep evaluation
/// order. Machines outside a rule's eligible subset are left out of that
/// rule's aggregate. A machine whose own identifier cannot be normalized
/// joins nothing and is classified on its own flags only.
pub fn aggregate(
    classifier: &ClassificationService,
    machines: &[Machine],
    index: &GroupingIndex<'_>,
) -> Vec<CapabilityAggregate> {
    let mut aggregates: Vec<CapabilityAggregate> = classifier
        .rules()
        .iter()
        .map(|r| CapabilityAggregate::new(r.capability))
        .collect();

    for machine in machines {
        let key = match identity::machine_key(&machine.name, &machine.id) {
            Ok(key) => Some(key),
            Err(e) => {
                debug!("Machine '{}' joins no records: {}", machine.name, e);
                None
            }
        };

        let extensions = key
            .as_ref()
            .map(|k| index.extensions_for(k))
            .unwrap_or_default();
        let assignment = key.as_ref().and_then(|k| index.assignment_for(k));
        let ctx = MachineContext::new(machine, extensions, assignment);

        for (agg, rule) in aggregates.iter_mut().zip(classifier.rules()) {
            let result = rule.classify(&ctx);
            if result.eligible {
                agg.record(&machine.name, result.enabled);
            }
        }
    }

    aggregates
}
