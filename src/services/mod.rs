//! Business logic services

pub mod aggregation;
pub mod benefits;
pub mod catalog;
pub mod classification;
pub mod graph;
pub mod grouping;
pub mod identity;
pub mod merge;
pub mod pipeline;
pub mod providers;
pub mod rates;
pub mod reporting;
pub mod resource_graph;
pub mod snapshot;
pub mod valuation;

pub use benefits::{BenefitService, SourceKind};
pub use catalog::BenefitCatalog;
pub use classification::{CapabilityRule, ClassificationService, MachineContext, STANDARD_RULES};
pub use graph::GraphLicenseClient;
pub use grouping::GroupingIndex;
pub use identity::JoinKey;
pub use pipeline::{capability_benefits, compute_benefits};
pub use providers::{
    DataSources, ExtensionProvider, InventoryProvider, InventorySnapshot, LicenseProvider,
    PolicyAssignmentProvider, SubscriptionProvider,
};
pub use rates::{RateEntry, RateLookup, RateTable};
pub use reporting::{BenefitFilter, StatusFilter};
pub use resource_graph::ResourceGraphClient;
pub use snapshot::SnapshotProvider;
