//! Machine configuration assignment summary

use serde::{Deserialize, Serialize};

/// Per-machine summary of guest configuration (machine configuration) assignments
///
/// A machine without a summary had no data returned by the source; a
/// summary with `assignment_count == 0` is known to have no assignments.
/// Callers keep that distinction by holding `Option<&PolicyAssignmentSummary>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyAssignmentSummary {
    /// Owning machine; a bare name or a full resource id
    #[serde(default)]
    pub machine_name: String,

    #[serde(default)]
    pub assignment_count: u64,

    #[serde(default)]
    pub assignments: Vec<String>,
}

impl PolicyAssignmentSummary {
    pub fn new(machine_name: impl Into<String>, assignments: Vec<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
            assignment_count: assignments.len() as u64,
            assignments,
        }
    }

    pub fn has_assignments(&self) -> bool {
        self.assignment_count > 0
    }
}
