mod finding;
mod plugin;
mod severity;

pub use finding::{Compliance, Cvss, Finding, FindingBuilder, Location, Remediation, Risk, Tool};
pub use plugin::PluginMetadata;
pub use severity::Severity;

/// Canonical schema version every `Finding` is stamped with.
///
/// Fixed per design decision: adapters never choose this value themselves,
/// regardless of what version string an upstream tool or a historical
/// adapter implementation might otherwise report.
pub const SCHEMA_VERSION: &str = "1.2.0";
