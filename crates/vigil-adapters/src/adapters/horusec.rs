use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field, tolerant_line_number};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "horusec",
    version: "1.0.0",
    tool_name: "horusec",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct HorusecAdapter;

impl AdapterPlugin for HorusecAdapter {
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
            tracing::warn!(adapter = "horusec", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(entries) = data.get("analysisVulnerabilities").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for entry in entries {
            let Some(vuln) = entry.get("vulnerabilities").and_then(|v| v.as_object()) else { continue };
            let rule_id = str_field(vuln, &["rule_id", "vulnerabilityID"]);
            if rule_id.is_empty() {
                continue;
            }
            let path = str_field(vuln, &["file"]);
            let line = tolerant_line_number(vuln.get("line"));
            let message = str_field(vuln, &["details"]);
            let severity = Severity::normalize(&str_field(vuln, &["severity"]));
            let language = str_field(vuln, &["language"]);
            let security_tool = str_field(vuln, &["securityTool"]);

            let id = fingerprint("horusec", &rule_id, &path, line, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id,
                severity,
                "horusec",
                "2.9",
                Location::new(path, line),
                message,
            )
            .tags(vec!["sast".to_string()])
            .context(serde_json::json!({"language": language, "security_tool": security_tool}))
            .raw(entry.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(HorusecAdapter)
}
