use crate::config::Config;
use crate::enrichment::enrich_trivy_with_syft;
use crate::walker;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use vigil_adapters::enrich_finding_with_compliance;
use vigil_adapters::registry::Registry;
use vigil_types::Finding;

/// Walks `root`, dispatches each discovered (adapter, file) pair to the
/// registry across a worker pool, then applies compliance enrichment and,
/// per target, Trivy↔Syft cross-tool enrichment over every gathered finding.
/// Compliance enrichment is applied here rather than inside each adapter so
/// the guarantee holds for every finding regardless of which adapter
/// produced it. Deduplication is not performed here — that is a consumer
/// concern.
pub fn gather_results(root: &Path, registry: &Registry, config: &Config) -> Vec<Finding> {
    let known: Vec<&str> = registry.names();
    let units = walker::discover(root, &known);
    if units.is_empty() {
        tracing::info!(targets = 0, findings = 0, "no recognized tool output found");
        return Vec::new();
    }

    let worker_count = config.limits.worker_count.max(1);
    let cancelled = AtomicBool::new(false);
    let by_target: Mutex<HashMap<String, Vec<Finding>>> = Mutex::new(HashMap::new());

    std::thread::scope(|scope| {
        let chunk_size = units.len().div_ceil(worker_count).max(1);
        let cancelled = &cancelled;
        let by_target = &by_target;
        for chunk in units.chunks(chunk_size) {
            scope.spawn(move || {
                for unit in chunk {
                    if cancelled.load(Ordering::Relaxed) {
                        break;
                    }
                    let Some(adapter) = registry.get(&unit.adapter_name) else {
                        continue;
                    };
                    let findings = adapter.parse(&unit.path);
                    let mut guard = by_target.lock().unwrap_or_else(|p| p.into_inner());
                    guard.entry(unit.target.clone()).or_default().extend(findings);
                }
            });
        }
    });

    let by_target = by_target.into_inner().unwrap_or_else(|p| p.into_inner());
    let mut adapters_failed = 0usize;
    let mut all = Vec::new();
    for (_target, findings) in by_target {
        if findings.is_empty() {
            adapters_failed += 1;
        }
        all.extend(enrich_trivy_with_syft(findings));
    }
    let all: Vec<Finding> = all.into_iter().map(enrich_finding_with_compliance).collect();

    tracing::info!(
        targets = units.iter().map(|u| u.target.clone()).collect::<std::collections::HashSet<_>>().len(),
        findings = all.len(),
        empty_targets = adapters_failed,
        "aggregation run complete"
    );

    all
}
