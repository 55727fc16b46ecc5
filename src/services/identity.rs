//! Machine identity normalization
//!
//! Records from different inventory queries name their owning machine in
//! different shapes: the machine row carries a display name, extension rows
//! carry either a projected name or their own resource id, and assignment
//! summaries carry a lower-cased name. All of them are reduced to a
//! case-folded [`JoinKey`].
//!
//! Display names keep the machine's original casing; only matching is
//! case-insensitive. This mirrors inconsistent casing across the upstream
//! queries and should be confirmed against real data before it is treated
//! as a contract.

use std::fmt;

use crate::utils::BenefitError;

/// Index of the machine-name segment in a `/`-split resource path
///
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.HybridCompute/machines/{name}`
/// splits into `["", "subscriptions", sub, "resourceGroups", rg, "providers",
/// "Microsoft.HybridCompute", "machines", name, ...]`. Child resources
/// (extensions, guest configuration assignments) share the same prefix.
pub const MACHINE_NAME_SEGMENT: usize = 8;

/// Case-folded machine identity used to correlate records
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinKey(String);

impl JoinKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produce the join key for a raw identifier
///
/// A structured resource path (leading `/`) yields its machine-name segment;
/// anything else is taken as a bare machine name.
pub fn normalize(raw: &str) -> Result<JoinKey, BenefitError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(BenefitError::malformed(raw, "identifier is empty"));
    }

    if !trimmed.starts_with('/') {
        return Ok(fold(trimmed));
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    match segments.get(MACHINE_NAME_SEGMENT) {
        Some(name) if !name.is_empty() => Ok(fold(name)),
        Some(_) => Err(BenefitError::malformed(raw, "machine name segment is empty")),
        None => Err(BenefitError::malformed(
            raw,
            format!(
                "expected at least {} path segments, found {}",
                MACHINE_NAME_SEGMENT + 1,
                segments.len()
            ),
        )),
    }
}

/// Join key for a machine row
///
/// Uses the display name when present, otherwise the machine's resource id.
pub fn machine_key(name: &str, id: &str) -> Result<JoinKey, BenefitError> {
    if name.trim().is_empty() {
        normalize(id)
    } else {
        normalize(name)
    }
}

fn fold(name: &str) -> JoinKey {
    JoinKey(name.to_lowercase())
}
