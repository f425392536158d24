use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "osv_scanner",
    version: "1.0.0",
    tool_name: "osv-scanner",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct OsvScannerAdapter;

fn severity_from_entries(entries: &[serde_json::Value]) -> Severity {
    for entry in entries {
        let Some(obj) = entry.as_object() else { continue };
        let Some(score_str) = obj.get("score").and_then(|v| v.as_str()) else { continue };
        // CVSS vector strings embed the numeric score only via the vector; OSV
        // typically reports a bare numeric score string for CVSS_V3 entries.
        if let Ok(score) = score_str.parse::<f64>() {
            return Severity::from_cvss_score(score);
        }
    }
    Severity::Medium
}

impl AdapterPlugin for OsvScannerAdapter {
    fn metadata(&self) -> &'static PluginMetadata {
        &METADATA
    }

    fn parse(&self, output_path: &Path) -> Vec<Finding> {
        let limits = ResourceLimits::default();
        let Some(raw) = read_bounded(output_path, &limits) else {
            return Vec::new();
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Vec::new();
        }
        let Some(data) = parse_json_bounded(raw, &limits) else {
            tracing::warn!(adapter = "osv_scanner", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(results) = data.get("results").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for result in results {
            let Some(result_obj) = result.as_object() else { continue };
            let source_path = result_obj
                .get("source")
                .and_then(|v| v.get("path"))
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            let Some(packages) = result_obj.get("packages").and_then(|v| v.as_array()) else { continue };

            for pkg_entry in packages {
                let Some(pkg_obj) = pkg_entry.as_object() else { continue };
                let package = pkg_obj.get("package").and_then(|v| v.as_object());
                let name = package.map(|p| str_field(p, &["name"])).unwrap_or_default();
                let version = package.map(|p| str_field(p, &["version"])).unwrap_or_default();
                let ecosystem = package.map(|p| str_field(p, &["ecosystem"])).unwrap_or_default();

                let Some(vulns) = pkg_obj.get("vulnerabilities").and_then(|v| v.as_array()) else { continue };
                for vuln in vulns {
                    let Some(vuln_obj) = vuln.as_object() else { continue };
                    let rule_id = str_field(vuln_obj, &["id"]);
                    if rule_id.is_empty() {
                        continue;
                    }
                    let summary = str_field(vuln_obj, &["summary"]);
                    let severity_entries = vuln_obj
                        .get("severity")
                        .and_then(|v| v.as_array())
                        .cloned()
                        .unwrap_or_default();
                    let severity = severity_from_entries(&severity_entries);
                    let message = format!("{rule_id} affects {name}@{version} ({ecosystem})");

                    let id = fingerprint("osv_scanner", &rule_id, source_path, 0, &message);
                    let finding = FindingBuilder::new(
                        id,
                        rule_id,
                        severity,
                        "osv-scanner",
                        "1.9",
                        Location::new(source_path.to_string(), 0),
                        message,
                    )
                    .description(summary)
                    .tags(vec!["sca".to_string(), "cve".to_string()])
                    .context(serde_json::json!({
                        "package_name": name,
                        "package_version": version,
                        "ecosystem": ecosystem,
                    }))
                    .raw(vuln.clone())
                    .build();

                    out.push(finding);
                }
            }
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(OsvScannerAdapter)
}
