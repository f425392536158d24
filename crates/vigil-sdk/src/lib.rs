//! Public, stable surface for consuming normalized scanner findings.
//!
//! This crate is a thin facade over `vigil-engine`'s aggregation pipeline and
//! `vigil-adapters`' registry: it is the supported entry point for an external
//! report renderer or policy gate, and owns no adapter-specific logic itself.
//!
//! ```no_run
//! use vigil_sdk::{default_registry, gather_results};
//! use std::path::Path;
//!
//! # fn main() -> vigil_sdk::Result<()> {
//! let registry = default_registry();
//! let findings = gather_results(Path::new("./scan-results"), &registry)?;
//! for finding in &findings {
//!     println!("{} [{}] {}", finding.id, finding.severity, finding.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::{Error, Result};
pub use vigil_adapters::registry::Registry as AdapterRegistry;
pub use vigil_engine::{Config, ValidationError};
pub use vigil_types::{Finding, PluginMetadata, Severity};

use std::path::Path;

/// Adapter registry, re-exported under the SDK's own name so a downstream
/// consumer never needs to depend on `vigil-adapters` directly.
pub type Registry = AdapterRegistry;

/// Convenience constructor matching the SDK's documented entry point; plain
/// alias for [`Registry::with_builtins`].
pub fn default_registry() -> Registry {
    Registry::with_builtins()
}

/// Walks `root` for recognized scanner output, dispatches each file to its
/// adapter, and returns the normalized, compliance-enriched finding stream.
///
/// Worker count, max file size, and max JSON nesting depth are drawn from the
/// environment (`JMO_SCAN_WORKERS`, `JMO_SCAN_MAX_FILE_BYTES`,
/// `JMO_SCAN_MAX_JSON_DEPTH`); invalid or missing values fall back silently.
pub fn gather_results(root: &Path, registry: &Registry) -> Result<Vec<Finding>> {
    if !root.exists() {
        return Err(Error::InvalidInput(format!(
            "results root does not exist: {}",
            root.display()
        )));
    }
    let config = Config::from_env();
    Ok(vigil_engine::gather_results(root, registry, &config))
}

/// Validate a finding against the canonical schema; re-exported so a
/// consumer doesn't need a direct `vigil-engine` dependency just to check
/// output before rendering it.
pub fn validate(finding: &Finding) -> std::result::Result<(), ValidationError> {
    vigil_engine::validate_finding(finding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_invalid_input() {
        let registry = default_registry();
        let result = gather_results(Path::new("/nonexistent/path/for/vigil-sdk-test"), &registry);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn default_registry_has_all_builtins() {
        assert_eq!(default_registry().len(), 27);
    }
}
