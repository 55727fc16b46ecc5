//! Capability classification
//!
//! Each capability is described by a [`CapabilityRule`]: an eligibility
//! predicate over the machine, an enabled predicate over the machine and its
//! joined records, display text and a default unit rate. The standard
//! catalog holds the ten Arc capabilities; the aggregator and the benefit
//! mapper iterate it generically.

use crate::models::{
    BenefitCategory, Capability, Classification, Extension, Machine, PolicyAssignmentSummary,
};

/// OS version markers identifying the hotpatch-capable release (Windows Server 2025)
pub const HOTPATCH_OS_MARKERS: [&str; 2] = ["2025", "10.0.26100"];

/// A machine together with the records joined to it
#[derive(Debug, Clone, Copy)]
pub struct MachineContext<'a> {
    pub machine: &'a Machine,
    pub extensions: &'a [&'a Extension],
    pub assignment: Option<&'a PolicyAssignmentSummary>,
}

impl<'a> MachineContext<'a> {
    pub fn new(
        machine: &'a Machine,
        extensions: &'a [&'a Extension],
        assignment: Option<&'a PolicyAssignmentSummary>,
    ) -> Self {
        Self {
            machine,
            extensions,
            assignment,
        }
    }

    fn any_extension(&self, predicate: impl Fn(&Extension) -> bool) -> bool {
        self.extensions.iter().any(|ext| predicate(ext))
    }
}

/// Phrases used to render a capability's description and details
#[derive(Debug, Clone, Copy)]
pub struct BenefitText {
    /// Population noun in the description ("servers")
    pub subject: &'static str,
    /// Population noun in the details
    pub detail_subject: &'static str,
    /// Gap phrase ("not configured for Update Manager")
    pub gap: &'static str,
    /// State phrase for enabled machines ("have Update Manager enabled")
    pub enabled_state: &'static str,
    /// Remedy phrase for disabled machines ("need configuration")
    pub remedy: &'static str,
}

impl BenefitText {
    const fn servers(
        gap: &'static str,
        enabled_state: &'static str,
        remedy: &'static str,
    ) -> Self {
        Self {
            subject: "servers",
            detail_subject: "servers",
            gap,
            enabled_state,
            remedy,
        }
    }

    /// `"{disabled} of {total} servers not configured for ..."`
    pub fn description(&self, disabled: u64, total: u64) -> String {
        format!("{} of {} {} {}", disabled, total, self.subject, self.gap)
    }

    /// `"{enabled} servers have ... {disabled} servers need ..."`
    pub fn details(&self, enabled: u64, disabled: u64) -> String {
        format!(
            "{} {} {}. {} {} {}.",
            enabled,
            self.detail_subject,
            self.enabled_state,
            disabled,
            self.detail_subject,
            self.remedy
        )
    }
}

/// Declarative descriptor for one capability
#[derive(Debug, Clone, Copy)]
pub struct CapabilityRule {
    pub capability: Capability,
    pub name: &'static str,
    pub category: BenefitCategory,
    pub is_free: bool,
    /// Currency per disabled machine per year
    pub default_rate: f64,
    /// Drop the benefit when no machine is eligible
    pub omit_when_no_eligible: bool,
    pub eligibility: fn(&Machine) -> bool,
    pub predicate: fn(&MachineContext<'_>) -> bool,
    pub text: BenefitText,
}

impl CapabilityRule {
    /// Evaluate this rule for one machine
    ///
    /// Total over partial data: missing fields evaluate to "not enabled".
    pub fn classify(&self, ctx: &MachineContext<'_>) -> Classification {
        let eligible = (self.eligibility)(ctx.machine);
        Classification {
            eligible,
            enabled: eligible && (self.predicate)(ctx),
        }
    }
}

fn all_machines(_: &Machine) -> bool {
    true
}

fn is_hotpatch_capable(machine: &Machine) -> bool {
    let version = machine.os_version();
    HOTPATCH_OS_MARKERS.iter().any(|m| version.contains(m))
}

fn update_management(ctx: &MachineContext<'_>) -> bool {
    ctx.machine.update_manager_enabled.unwrap_or(false)
}

fn change_tracking(ctx: &MachineContext<'_>) -> bool {
    ctx.any_extension(|ext| {
        let t = ext.extension_type();
        t.contains("ChangeTracking") || t.contains("MicrosoftMonitoringAgent")
    })
}

fn monitoring(ctx: &MachineContext<'_>) -> bool {
    ctx.any_extension(|ext| {
        let t = ext.extension_type();
        t.contains("AzureMonitor") || t.contains("LogAnalytics") || t.contains("OmsAgent")
    })
}

fn guest_configuration(ctx: &MachineContext<'_>) -> bool {
    ctx.any_extension(|ext| {
        let gc_extension = ext.publisher() == "Microsoft.GuestConfiguration"
            && matches!(
                ext.extension_type(),
                "ConfigurationForWindows" | "ConfigurationForLinux"
            );
        gc_extension || ext.extension_name().to_lowercase().contains("azurepolicyfor")
    })
}

fn endpoint_defense(ctx: &MachineContext<'_>) -> bool {
    ctx.any_extension(|ext| {
        ext.extension_type().contains("MDE") || ext.publisher().contains("Microsoft.Azure.Security")
    })
}

fn automated_configuration(ctx: &MachineContext<'_>) -> bool {
    ctx.assignment.is_some_and(|a| a.has_assignments())
}

fn best_practice_assessment(ctx: &MachineContext<'_>) -> bool {
    ctx.any_extension(|ext| {
        let t = ext.extension_type();
        t.eq_ignore_ascii_case("windowsserverassessment")
            || t.eq_ignore_ascii_case("assessmentplatform")
    })
}

fn resource_tagging(ctx: &MachineContext<'_>) -> bool {
    ctx.machine.has_tags()
}

fn remote_admin_console(ctx: &MachineContext<'_>) -> bool {
    ctx.any_extension(|ext| {
        ext.extension_type().to_lowercase().contains("admincenter")
            || ext.extension_name().to_lowercase().contains("admincenter")
    })
}

fn hotpatching(ctx: &MachineContext<'_>) -> bool {
    ctx.machine.has_hotpatch.unwrap_or(false)
}

/// The standard rule table, in benefit output order
pub const STANDARD_RULES: [CapabilityRule; 10] = [
    CapabilityRule {
        capability: Capability::UpdateManagement,
        name: "Azure Arc-enabled Servers - Update Manager",
        category: BenefitCategory::Security,
        is_free: true,
        default_rate: 400.0,
        omit_when_no_eligible: false,
        eligibility: all_machines,
        predicate: update_management,
        text: BenefitText::servers(
            "not configured for Update Manager",
            "have Update Manager enabled",
            "need configuration",
        ),
    },
    CapabilityRule {
        capability: Capability::ChangeTracking,
        name: "Azure Arc-enabled Servers - Inventory & Tracking",
        category: BenefitCategory::Security,
        is_free: true,
        default_rate: 300.0,
        omit_when_no_eligible: false,
        eligibility: all_machines,
        predicate: change_tracking,
        text: BenefitText::servers(
            "not configured for Change Tracking",
            "have Change Tracking enabled",
            "need configuration",
        ),
    },
    CapabilityRule {
        capability: Capability::Monitoring,
        name: "Arc-enabled Servers - Monitoring & Insights",
        category: BenefitCategory::Free,
        is_free: true,
        default_rate: 200.0,
        omit_when_no_eligible: false,
        eligibility: all_machines,
        predicate: monitoring,
        text: BenefitText::servers(
            "not configured for Azure Monitor",
            "have Azure Monitor enabled",
            "need configuration",
        ),
    },
    CapabilityRule {
        capability: Capability::GuestConfiguration,
        name: "Azure Arc-enabled Servers - Guest Configuration",
        category: BenefitCategory::Security,
        is_free: true,
        default_rate: 350.0,
        omit_when_no_eligible: false,
        eligibility: all_machines,
        predicate: guest_configuration,
        text: BenefitText::servers(
            "not configured for Guest Configuration",
            "have Guest Configuration enabled",
            "need configuration",
        ),
    },
    CapabilityRule {
        capability: Capability::EndpointDefense,
        name: "Arc-enabled Servers - Microsoft Defender for Cloud",
        category: BenefitCategory::Security,
        is_free: false,
        default_rate: 450.0,
        omit_when_no_eligible: false,
        eligibility: all_machines,
        predicate: endpoint_defense,
        text: BenefitText::servers(
            "not protected by Defender",
            "have Defender for Cloud enabled",
            "need configuration",
        ),
    },
    CapabilityRule {
        capability: Capability::AutomatedConfiguration,
        name: "Arc-enabled Servers - Automated Machine Configuration",
        category: BenefitCategory::Deployment,
        is_free: true,
        default_rate: 275.0,
        omit_when_no_eligible: false,
        eligibility: all_machines,
        predicate: automated_configuration,
        text: BenefitText::servers(
            "not configured for Automation",
            "have Automated Configuration enabled",
            "need configuration",
        ),
    },
    CapabilityRule {
        capability: Capability::BestPracticeAssessment,
        name: "Arc-enabled Servers - Best Practice Assessment",
        category: BenefitCategory::Free,
        is_free: true,
        default_rate: 250.0,
        omit_when_no_eligible: false,
        eligibility: all_machines,
        predicate: best_practice_assessment,
        text: BenefitText::servers(
            "not configured for Best Practice Assessment",
            "have Best Practice Assessment enabled",
            "need configuration",
        ),
    },
    CapabilityRule {
        capability: Capability::ResourceTagging,
        name: "Arc-enabled Servers - Resource Tagging",
        category: BenefitCategory::Deployment,
        is_free: true,
        default_rate: 150.0,
        omit_when_no_eligible: false,
        eligibility: all_machines,
        predicate: resource_tagging,
        text: BenefitText::servers(
            "have no tags",
            "have tags applied",
            "need tags for governance and cost tracking",
        ),
    },
    CapabilityRule {
        capability: Capability::RemoteAdminConsole,
        name: "Arc-enabled Servers - Windows Admin Center",
        category: BenefitCategory::Deployment,
        is_free: true,
        default_rate: 125.0,
        omit_when_no_eligible: false,
        eligibility: all_machines,
        predicate: remote_admin_console,
        text: BenefitText::servers(
            "without Admin Center",
            "have Windows Admin Center extension",
            "need the extension for remote management",
        ),
    },
    CapabilityRule {
        capability: Capability::Hotpatching,
        name: "Arc-enabled Servers - Hotpatching (WS2025)",
        category: BenefitCategory::Free,
        is_free: true,
        default_rate: 225.0,
        omit_when_no_eligible: true,
        eligibility: is_hotpatch_capable,
        predicate: hotpatching,
        text: BenefitText {
            subject: "Windows Server 2025 servers",
            detail_subject: "WS2025 servers",
            gap: "not using hotpatching",
            enabled_state: "have hotpatching enabled",
            remedy: "need hotpatching for rebootless security updates",
        },
    },
];

/// Ordered set of capability rules evaluated in one run
#[derive(Debug, Clone)]
pub struct ClassificationService {
    rules: Vec<CapabilityRule>,
}

impl Default for ClassificationService {
    fn default() -> Self {
        Self::new(STANDARD_RULES.to_vec())
    }
}

impl ClassificationService {
    /// Create a classification service over the given rules
    pub fn new(rules: Vec<CapabilityRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CapabilityRule] {
        &self.rules
    }

    /// Descriptor for a capability, if present in this catalog
    pub fn rule(&self, capability: Capability) -> Option<&CapabilityRule> {
        self.rules.iter().find(|r| r.capability == capability)
    }

    /// Evaluate every rule for one machine, catalog order
    pub fn classify(&self, ctx: &MachineContext<'_>) -> Vec<(Capability, Classification)> {
        self.rules
            .iter()
            .map(|rule| {
                let result = rule.classify(ctx);
                tracing::trace!(
                    "Rule evaluation: machine='{}' rule='{}' eligible={} enabled={}",
                    ctx.machine.name,
                    rule.capability,
                    result.eligible,
                    result.enabled
                );
                (rule.capability, result)
            })
            .collect()
    }
}

/// Default unit rate for a capability from the standard table
pub fn default_rate(capability: Capability) -> f64 {
    STANDARD_RULES
        .iter()
        .find(|r| r.capability == capability)
        .map(|r| r.default_rate)
        .unwrap_or(0.0)
}
