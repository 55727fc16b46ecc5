//! Machine inventory data model

use serde::{Deserialize, Serialize};

/// An Arc-enabled server as returned by the inventory source
///
/// Field names follow the Resource Graph projection (camelCase). Every
/// attribute besides `name` is optional so that partial rows still
/// deserialize; absent flags classify as "not enabled".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    /// Full resource id (`/subscriptions/.../machines/{name}`)
    #[serde(default)]
    pub id: String,

    /// Display name, original casing preserved
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub resource_group: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    /// Operating system family (`windows` / `linux`)
    #[serde(default)]
    pub os_type: Option<String>,

    /// Operating system version string (e.g. `10.0.26100.2033`)
    #[serde(default)]
    pub os_version: Option<String>,

    /// Agent connection status
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub provisioning_state: Option<String>,

    /// Patch assessment mode configured for the machine's OS
    #[serde(default)]
    pub update_manager_enabled: Option<bool>,

    /// Any extension present on the machine
    #[serde(default)]
    pub monitoring_enabled: Option<bool>,

    /// Hotpatching enabled in the Windows patch settings
    #[serde(default)]
    pub has_hotpatch: Option<bool>,

    /// Tag collection present and not the empty object
    #[serde(default)]
    pub has_tags: Option<bool>,

    /// Raw tag collection
    #[serde(default)]
    pub tags: Option<serde_json::Value>,

    #[serde(default)]
    pub last_seen_time: Option<String>,
}

impl Machine {
    /// Create a machine with just an id and a display name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether the machine carries at least one tag
    ///
    /// Uses the precomputed flag when the source supplied one, otherwise
    /// derives it from the raw tag collection.
    pub fn has_tags(&self) -> bool {
        match self.has_tags {
            Some(flag) => flag,
            None => match &self.tags {
                Some(serde_json::Value::Object(map)) => !map.is_empty(),
                Some(serde_json::Value::Null) | None => false,
                Some(_) => true,
            },
        }
    }

    /// OS version string, empty when absent
    pub fn os_version(&self) -> &str {
        self.os_version.as_deref().unwrap_or_default()
    }
}
