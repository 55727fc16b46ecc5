//! Test fixtures for common test data
//!
//! Fixtures provide pre-defined inventories that can be used across
//! multiple tests.

use arc_benefits::models::{Extension, LicenseSku, Machine, PolicyAssignmentSummary, PrepaidUnits};

use super::factories::{assignments, extension, MachineBuilder};

/// Fixed identifiers for testing
pub mod ids {
    pub const SUBSCRIPTION_ID: &str = "6f1c2a3b-0000-4abc-9def-123456789abc";
    pub const WINDOWS_SKU_ID: &str = "c5928f49-12ba-48f7-ada3-0d743a3601d5";
    pub const OFFICE_SKU_ID: &str = "18181a46-0d4e-45cd-891e-60aabd171b4e";
}

/// Machine fixtures
pub struct MachineFixtures;

impl MachineFixtures {
    /// web-01 with Update Manager, web-02 and web-03 without
    pub fn three_servers_one_patched() -> Vec<Machine> {
        vec![
            MachineBuilder::new("web-01").with_update_manager().build(),
            MachineBuilder::new("web-02").build(),
            MachineBuilder::new("web-03").build(),
        ]
    }

    /// One Windows Server 2025 host with hotpatch and one older host
    pub fn hotpatch_fleet() -> Vec<Machine> {
        vec![
            MachineBuilder::new("ws25-01")
                .windows_server_2025()
                .with_hotpatch()
                .build(),
            MachineBuilder::new("ws22-01")
                .with_os_version("10.0.20348.2113")
                .build(),
        ]
    }

    /// Hosts on releases that cannot hotpatch
    pub fn legacy_fleet() -> Vec<Machine> {
        vec![
            MachineBuilder::new("ws19-01")
                .with_os_version("10.0.17763.5458")
                .build(),
            MachineBuilder::new("ws22-01")
                .with_os_version("10.0.20348.2113")
                .build(),
        ]
    }
}

/// A small, fully described inventory
pub struct InventoryFixture {
    pub machines: Vec<Machine>,
    pub extensions: Vec<Extension>,
    pub assignments: Vec<PolicyAssignmentSummary>,
}

impl InventoryFixture {
    /// Three machines with a mix of capabilities
    ///
    /// - web-01: Update Manager, Azure Monitor, Defender, two assignments, tags
    /// - web-02: Change Tracking, Admin Center, zero assignments
    /// - db-01: nothing configured, no assignment data
    pub fn mixed() -> Self {
        Self {
            machines: vec![
                MachineBuilder::new("web-01")
                    .with_update_manager()
                    .with_tag("env", "prod")
                    .build(),
                MachineBuilder::new("web-02").build(),
                MachineBuilder::new("db-01").build(),
            ],
            extensions: vec![
                extension("web-01", "AzureMonitorWindowsAgent"),
                extension("web-01", "MDE.Windows"),
                extension("web-02", "ChangeTracking-Windows"),
                extension("web-02", "AdminCenter"),
            ],
            assignments: vec![assignments("web-01", 2), assignments("web-02", 0)],
        }
    }
}

/// License fixtures
pub struct LicenseFixtures;

impl LicenseFixtures {
    pub fn windows_server() -> LicenseSku {
        LicenseSku {
            sku_id: ids::WINDOWS_SKU_ID.to_string(),
            sku_part_number: "WIN_SERVER_STANDARD".to_string(),
            consumed_units: 3,
            prepaid_units: Some(PrepaidUnits {
                enabled: 10,
                ..Default::default()
            }),
        }
    }

    pub fn office() -> LicenseSku {
        LicenseSku {
            sku_id: ids::OFFICE_SKU_ID.to_string(),
            sku_part_number: "O365_BUSINESS_PREMIUM".to_string(),
            consumed_units: 25,
            prepaid_units: Some(PrepaidUnits {
                enabled: 25,
                ..Default::default()
            }),
        }
    }
}
