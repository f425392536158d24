pub mod aflplusplus;
pub mod akto;
pub mod bandit;
pub mod bearer;
pub mod cdxgen;
pub mod checkov;
pub mod dependency_check;
pub mod falco;
pub mod gosec;
pub mod grype;
pub mod hadolint;
pub mod horusec;
pub mod kubescape;
pub mod lynis;
pub mod mobsf;
pub mod noseyparker;
pub mod osv_scanner;
pub mod prowler;
pub mod scancode;
pub mod semgrep;
pub mod semgrep_secrets;
pub mod syft;
pub mod trivy;
pub mod trivy_rbac;
pub mod trufflehog;
pub mod yara;
pub mod zap;

use crate::registry::Registry;

/// Registers every adapter this crate ships with the given registry. Callers
/// that only need a subset, or want to override one, can start from an empty
/// `Registry` and call `register` directly instead.
pub fn register_builtin(registry: &mut Registry) {
    registry.register(aflplusplus::construct);
    registry.register(akto::construct);
    registry.register(bandit::construct);
    registry.register(bearer::construct);
    registry.register(cdxgen::construct);
    registry.register(checkov::construct);
    registry.register(dependency_check::construct);
    registry.register(falco::construct);
    registry.register(gosec::construct);
    registry.register(grype::construct);
    registry.register(hadolint::construct);
    registry.register(horusec::construct);
    registry.register(kubescape::construct);
    registry.register(lynis::construct);
    registry.register(mobsf::construct);
    registry.register(noseyparker::construct);
    registry.register(osv_scanner::construct);
    registry.register(prowler::construct);
    registry.register(scancode::construct);
    registry.register(semgrep::construct);
    registry.register(semgrep_secrets::construct);
    registry.register(syft::construct);
    registry.register(trivy::construct);
    registry.register(trivy_rbac::construct);
    registry.register(trufflehog::construct);
    registry.register(yara::construct);
    registry.register(zap::construct);
}
