//! Machine extension data model

use serde::{Deserialize, Serialize};

/// An extension (agent/add-on) installed on a machine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    /// Full extension resource id, used for joining when `machine_name` is absent
    #[serde(default)]
    pub id: Option<String>,

    /// Owning machine name as projected by the source (bare segment)
    #[serde(default)]
    pub machine_name: Option<String>,

    #[serde(default)]
    pub extension_name: Option<String>,

    /// Extension type (e.g. `AzureMonitorWindowsAgent`)
    #[serde(default)]
    pub extension_type: Option<String>,

    /// Publisher (e.g. `Microsoft.Azure.Monitor`)
    #[serde(default)]
    pub publisher: Option<String>,

    #[serde(default)]
    pub provisioning_state: Option<String>,

    #[serde(default)]
    pub resource_group: Option<String>,
}

impl Extension {
    /// Create an extension owned by `machine_name` with the given type
    pub fn new(machine_name: impl Into<String>, extension_type: impl Into<String>) -> Self {
        Self {
            machine_name: Some(machine_name.into()),
            extension_type: Some(extension_type.into()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.extension_name = Some(name.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Identifier used to find the owning machine
    pub fn owner_identifier(&self) -> Option<&str> {
        self.machine_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.id.as_deref())
    }

    pub fn extension_type(&self) -> &str {
        self.extension_type.as_deref().unwrap_or_default()
    }

    pub fn extension_name(&self) -> &str {
        self.extension_name.as_deref().unwrap_or_default()
    }

    pub fn publisher(&self) -> &str {
        self.publisher.as_deref().unwrap_or_default()
    }
}
