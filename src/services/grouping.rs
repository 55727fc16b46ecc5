//! Grouping index: joins extensions and assignment summaries to machines

use std::collections::HashMap;

use tracing::debug;

use crate::models::{Extension, PolicyAssignmentSummary};
use crate::services::identity::{self, JoinKey};

/// Per-run index from machine join key to the records that machine owns
///
/// Borrows the input collections; nothing is cloned or mutated.
#[derive(Debug, Default)]
pub struct GroupingIndex<'a> {
    extensions: HashMap<JoinKey, Vec<&'a Extension>>,
    assignments: HashMap<JoinKey, &'a PolicyAssignmentSummary>,
    skipped_extensions: usize,
    skipped_assignments: usize,
    duplicate_assignments: usize,
}

impl<'a> GroupingIndex<'a> {
    /// Build both maps in one pass over each input
    ///
    /// Extensions keep input order within a machine. When several summaries
    /// name the same machine the last one wins. Records whose identifier
    /// cannot be normalized are skipped and counted.
    pub fn build(
        extensions: &'a [Extension],
        assignments: &'a [PolicyAssignmentSummary],
    ) -> Self {
        let mut index = GroupingIndex::default();

        for ext in extensions {
            let Some(owner) = ext.owner_identifier() else {
                debug!(
                    "Skipping extension {:?}: no owning machine identifier",
                    ext.extension_name
                );
                index.skipped_extensions += 1;
                continue;
            };

            match identity::normalize(owner) {
                Ok(key) => index.extensions.entry(key).or_default().push(ext),
                Err(e) => {
                    debug!("Skipping extension {:?}: {}", ext.extension_name, e);
                    index.skipped_extensions += 1;
                }
            }
        }

        for summary in assignments {
            match identity::normalize(&summary.machine_name) {
                Ok(key) => {
                    if index.assignments.insert(key.clone(), summary).is_some() {
                        debug!(
                            "Duplicate assignment summary for machine '{}', keeping the last one",
                            key
                        );
                        index.duplicate_assignments += 1;
                    }
                }
                Err(e) => {
                    debug!("Skipping assignment summary: {}", e);
                    index.skipped_assignments += 1;
                }
            }
        }

        index
    }

    /// Extensions owned by the machine, input order; empty when none joined
    pub fn extensions_for(&self, key: &JoinKey) -> &[&'a Extension] {
        self.extensions
            .get(key)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// Assignment summary for the machine, `None` when the source returned none
    pub fn assignment_for(&self, key: &JoinKey) -> Option<&'a PolicyAssignmentSummary> {
        self.assignments.get(key).copied()
    }

    /// Number of distinct machines with at least one extension
    pub fn machines_with_extensions(&self) -> usize {
        self.extensions.len()
    }

    pub fn skipped_extensions(&self) -> usize {
        self.skipped_extensions
    }

    pub fn skipped_assignments(&self) -> usize {
        self.skipped_assignments
    }

    pub fn duplicate_assignments(&self) -> usize {
        self.duplicate_assignments
    }
}
