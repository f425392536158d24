use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field, tolerant_line_number};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Risk, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "noseyparker",
    version: "1.0.0",
    tool_name: "noseyparker",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct NoseyparkerAdapter;

impl AdapterPlugin for NoseyparkerAdapter {
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
            tracing::warn!(adapter = "noseyparker", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(matches) = data.get("matches").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for m in matches {
            let Some(obj) = m.as_object() else { continue };
            let rule_id = str_field(obj, &["signature", "DetectorName"]);
            if rule_id.is_empty() {
                continue;
            }
            let location = obj.get("location").and_then(|v| v.as_object());
            let path = location
                .map(|l| str_field(l, &["path"]))
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| str_field(obj, &["path"]));
            let line = location
                .and_then(|l| l.get("startLine"))
                .map(|v| tolerant_line_number(Some(v)))
                .unwrap_or_else(|| tolerant_line_number(obj.get("line_number")));
            let context_text = str_field(obj, &["match", "context"]);
            let message = if context_text.is_empty() {
                format!("Potential secret detected by Nosey Parker ({rule_id})")
            } else {
                format!("Potential secret detected by Nosey Parker ({rule_id}): {context_text}")
            };

            let id = fingerprint("noseyparker", &rule_id, &path, line, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id,
                Severity::Medium,
                "noseyparker",
                "0.22",
                Location::new(path, line),
                message,
            )
            .description("Rotate the exposed credential and purge it from version control history.")
            .tags(vec!["secrets".to_string()])
            .risk(Risk {
                cwe: vec!["CWE-798".to_string()],
                ..Risk::default()
            })
            .raw(m.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(NoseyparkerAdapter)
}
