use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "kubescape",
    version: "1.0.0",
    tool_name: "kubescape",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct KubescapeAdapter;

fn severity_from_score_factor(score_factor: f64) -> Severity {
    if score_factor >= 10.0 {
        Severity::Critical
    } else if score_factor >= 7.0 {
        Severity::High
    } else if score_factor >= 4.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

impl AdapterPlugin for KubescapeAdapter {
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
            tracing::warn!(adapter = "kubescape", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(summary_details) = data.get("summaryDetails").and_then(|v| v.as_object()) else {
            return Vec::new();
        };
        let Some(controls) = summary_details.get("controls").and_then(|v| v.as_object()) else {
            return Vec::new();
        };

        // `resources` maps resourceID -> {kind, namespace, name}; failedResources entries
        // are resource-ID strings resolved against this map, not inline objects.
        let mut resource_map = std::collections::HashMap::new();
        if let Some(resources) = data.get("resources").and_then(|v| v.as_array()) {
            for resource in resources {
                if let Some(resource_obj) = resource.as_object() {
                    let res_id = str_field(resource_obj, &["resourceID"]);
                    if !res_id.is_empty() {
                        resource_map.insert(res_id, resource_obj.clone());
                    }
                }
            }
        }

        let mut out = Vec::new();
        for (control_id, control) in controls {
            let Some(obj) = control.as_object() else { continue };
            let control_name = str_field(obj, &["name"]);
            let control_name = if control_name.is_empty() { control_id.clone() } else { control_name };
            let score_factor = obj
                .get("scoreFactor")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let severity = severity_from_score_factor(score_factor);

            let Some(failed_resources) = obj.get("failedResources").and_then(|v| v.as_array()) else {
                continue;
            };
            // Only controls with failing resources produce findings; one per resource.
            if failed_resources.is_empty() {
                continue;
            }

            for failed_res in failed_resources {
                let Some(failed_res_id) = failed_res.as_str() else { continue };
                let resource_obj = resource_map.get(failed_res_id);
                let kind = resource_obj
                    .map(|o| str_field(o, &["kind"]))
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string());
                let namespace = resource_obj
                    .map(|o| str_field(o, &["namespace"]))
                    .unwrap_or_default();
                let name = resource_obj
                    .map(|o| str_field(o, &["name"]))
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| failed_res_id.to_string());

                let path = if namespace.is_empty() {
                    format!("{kind}/{name}")
                } else {
                    format!("{namespace}/{kind}/{name}")
                };
                let message = format!("{control_name}: resource {path} failed control {control_id}");

                let id = fingerprint("kubescape", control_id, &path, 0, &message);
                let finding = FindingBuilder::new(
                    id,
                    control_id.clone(),
                    severity,
                    "kubescape",
                    "3.0",
                    Location::new(path, 0),
                    message.clone(),
                )
                .title(control_name.clone())
                .description(message)
                .tags(vec!["k8s-security".to_string(), "misconfiguration".to_string()])
                .raw(control.clone())
                .build();

                out.push(finding);
            }
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(KubescapeAdapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fixture(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{contents}").unwrap();
        f
    }

    #[test]
    fn score_factor_ten_is_critical_one_finding_per_resource() {
        let adapter = KubescapeAdapter;
        let f = write_fixture(
            r#"{
                "summaryDetails": {"controls": {"C-0001": {"name": "Privileged container", "scoreFactor": 10, "failedResources": ["pod-1", "pod-2"]}}},
                "resources": [
                    {"resourceID": "pod-1", "kind": "Pod", "namespace": "default", "name": "web-1"},
                    {"resourceID": "pod-2", "kind": "Pod", "namespace": "default", "name": "web-2"}
                ]
            }"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.severity == Severity::Critical));
        let paths: Vec<&str> = findings.iter().map(|f| f.location.path.as_str()).collect();
        assert_ne!(paths[0], paths[1]);
    }

    #[test]
    fn failed_resources_without_resource_map_entry_still_yield_findings() {
        // S6: failedResources is a plain list of resource-ID strings with no
        // matching entry in `resources` — must still resolve to one finding each.
        let adapter = KubescapeAdapter;
        let f = write_fixture(
            r#"{"summaryDetails": {"controls": {"C-0001": {"name": "Privileged container", "scoreFactor": 10, "failedResources": ["pod-1", "pod-2"]}}}}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.severity == Severity::Critical));
        let paths: Vec<&str> = findings.iter().map(|f| f.location.path.as_str()).collect();
        assert_ne!(paths[0], paths[1]);
    }

    #[test]
    fn controls_without_failed_resources_emit_nothing() {
        let adapter = KubescapeAdapter;
        let f = write_fixture(
            r#"{"summaryDetails": {"controls": {"C-0002": {"name": "Passing control", "scoreFactor": 10, "failedResources": []}}}}"#,
        );
        assert!(adapter.parse(f.path()).is_empty());
    }
}
