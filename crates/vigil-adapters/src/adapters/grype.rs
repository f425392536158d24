use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Cvss, Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "grype",
    version: "1.0.0",
    tool_name: "grype",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct GrypeAdapter;

/// Prefer a CVSS v3.x score over v2 when both are present, as v3 is the
/// more discriminating and current standard.
fn preferred_cvss(entries: &[Value]) -> Option<Cvss> {
    let find = |prefix: &str, normalized_version: &str| {
        entries.iter().find_map(|entry| {
            let obj = entry.as_object()?;
            let version = obj.get("version")?.as_str()?;
            if !version.starts_with(prefix) {
                return None;
            }
            let score = obj.get("metrics")?.get("baseScore")?.as_f64()?;
            let vector = obj
                .get("vector")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            Some(Cvss {
                version: normalized_version.to_string(),
                score,
                vector,
            })
        })
    };
    find("3", "3.x").or_else(|| find("2", "2.0"))
}

impl AdapterPlugin for GrypeAdapter {
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
            tracing::warn!(adapter = "grype", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(matches) = data.get("matches").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for item in matches {
            let Some(obj) = item.as_object() else { continue };
            let Some(vuln) = obj.get("vulnerability").and_then(|v| v.as_object()) else { continue };
            let rule_id = str_field(vuln, &["id"]);
            if rule_id.is_empty() {
                continue;
            }
            let artifact = obj.get("artifact").and_then(|v| v.as_object());
            let artifact_name = artifact.map(|a| str_field(a, &["name"])).unwrap_or_default();
            let artifact_version = artifact.map(|a| str_field(a, &["version"])).unwrap_or_default();
            let purl = artifact.and_then(|a| a.get("purl")).and_then(|v| v.as_str());
            let path = artifact_name.clone();

            let cvss_entries = vuln.get("cvss").and_then(|v| v.as_array()).cloned().unwrap_or_default();
            let cvss = preferred_cvss(&cvss_entries);
            let severity = cvss
                .as_ref()
                .map(|c| Severity::from_cvss_score(c.score))
                .unwrap_or_else(|| Severity::normalize(&str_field(vuln, &["severity"])));

            let message = format!("{rule_id} affects {artifact_name}@{artifact_version}");
            let id = fingerprint("grype", &rule_id, &path, 0, &message);

            let mut builder = FindingBuilder::new(
                id,
                rule_id.clone(),
                severity,
                "grype",
                "0.79",
                Location::new(path, 0),
                message,
            )
            .tags(vec!["sca".to_string(), "cve".to_string()])
            .raw(item.clone());

            if let Some(cvss) = cvss {
                builder = builder.cvss(cvss);
            }
            if let Some(purl) = purl {
                builder = builder.context(serde_json::json!({
                    "artifact_purl": purl,
                    "artifact_name": artifact_name,
                    "artifact_version": artifact_version,
                }));
            }

            out.push(builder.build());
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(GrypeAdapter)
}
