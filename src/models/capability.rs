//! Capability rule identifiers and aggregates

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A governance/management capability tracked per machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    UpdateManagement,
    ChangeTracking,
    Monitoring,
    GuestConfiguration,
    EndpointDefense,
    AutomatedConfiguration,
    BestPracticeAssessment,
    ResourceTagging,
    RemoteAdminConsole,
    Hotpatching,
}

impl Capability {
    /// All capabilities in benefit output order
    pub const ALL: [Capability; 10] = [
        Capability::UpdateManagement,
        Capability::ChangeTracking,
        Capability::Monitoring,
        Capability::GuestConfiguration,
        Capability::EndpointDefense,
        Capability::AutomatedConfiguration,
        Capability::BestPracticeAssessment,
        Capability::ResourceTagging,
        Capability::RemoteAdminConsole,
        Capability::Hotpatching,
    ];

    /// Rule identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::UpdateManagement => "update-management",
            Capability::ChangeTracking => "change-tracking",
            Capability::Monitoring => "monitoring",
            Capability::GuestConfiguration => "guest-configuration",
            Capability::EndpointDefense => "endpoint-defense",
            Capability::AutomatedConfiguration => "automated-configuration",
            Capability::BestPracticeAssessment => "best-practice-assessment",
            Capability::ResourceTagging => "resource-tagging",
            Capability::RemoteAdminConsole => "remote-admin-console",
            Capability::Hotpatching => "hotpatching",
        }
    }

    /// Stable benefit key shared with the static catalog
    pub fn benefit_id(&self) -> &'static str {
        match self {
            Capability::UpdateManagement => "arc-001",
            Capability::ChangeTracking => "arc-002",
            Capability::GuestConfiguration => "arc-003",
            Capability::BestPracticeAssessment => "arc-004",
            Capability::Monitoring => "arc-006",
            Capability::EndpointDefense => "arc-007",
            Capability::AutomatedConfiguration => "arc-008",
            Capability::ResourceTagging => "arc-009",
            Capability::RemoteAdminConsole => "arc-010",
            Capability::Hotpatching => "arc-011",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCapability(pub String);

impl fmt::Display for UnknownCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown capability: {}", self.0)
    }
}

impl std::error::Error for UnknownCapability {}

impl FromStr for Capability {
    type Err = UnknownCapability;

    /// Accepts either the rule identifier or the benefit key (`arc-001`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == needle || c.benefit_id() == needle)
            .ok_or_else(|| UnknownCapability(s.to_string()))
    }
}

impl Serialize for Capability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of evaluating one rule against one machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    /// Machine belongs to the rule's eligible subset
    pub eligible: bool,
    /// Machine has the capability configured (always false when not eligible)
    pub enabled: bool,
}

/// Per-rule fold over the machine list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityAggregate {
    pub capability: Capability,
    pub enabled: u64,
    pub disabled: u64,
    /// Enabled machine names, evaluation order
    pub enabled_servers: Vec<String>,
    /// Disabled machine names, evaluation order
    pub disabled_servers: Vec<String>,
}

impl CapabilityAggregate {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            enabled: 0,
            disabled: 0,
            enabled_servers: Vec::new(),
            disabled_servers: Vec::new(),
        }
    }

    /// Size of the eligible subset
    pub fn total(&self) -> u64 {
        self.enabled + self.disabled
    }

    /// Record one eligible machine
    pub fn record(&mut self, name: &str, enabled: bool) {
        if enabled {
            self.enabled += 1;
            self.enabled_servers.push(name.to_string());
        } else {
            self.disabled += 1;
            self.disabled_servers.push(name.to_string());
        }
    }
}
