use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "hadolint",
    version: "1.0.0",
    tool_name: "hadolint",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct HadolintAdapter;

impl AdapterPlugin for HadolintAdapter {
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
            tracing::warn!(adapter = "hadolint", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        // Hadolint emits a bare top-level array, not an object wrapper.
        let Some(items) = data.as_array() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for item in items {
            let Some(obj) = item.as_object() else { continue };
            let rule_id = str_field(obj, &["code"]);
            if rule_id.is_empty() {
                continue;
            }
            let path = str_field(obj, &["file"]);
            let line = obj.get("line").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
            let message = str_field(obj, &["message"]);
            let severity = Severity::normalize(&str_field(obj, &["level"]));

            let id = fingerprint("hadolint", &rule_id, &path, line, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id.clone(),
                severity,
                "hadolint",
                "2.12.0",
                Location::new(path, line),
                message.clone(),
            )
            .description(message)
            .tags(vec!["iac".to_string(), "dockerfile".to_string()])
            .raw(item.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(HadolintAdapter)
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
    fn parses_bare_array_shape() {
        let adapter = HadolintAdapter;
        let f = write_fixture(
            r#"[{"code": "DL3007", "level": "warning", "message": "Using latest is prone to errors", "file": "Dockerfile", "line": 2}]"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn object_top_level_is_wrong_shape_and_yields_none() {
        let adapter = HadolintAdapter;
        let f = write_fixture(r#"{"code": "DL3007"}"#);
        assert!(adapter.parse(f.path()).is_empty());
    }
}
