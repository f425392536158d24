use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field, tolerant_line_number};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "gosec",
    version: "1.0.0",
    tool_name: "gosec",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct GosecAdapter;

impl AdapterPlugin for GosecAdapter {
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
            tracing::warn!(adapter = "gosec", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(issues) = data.get("Issues").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for issue in issues {
            let Some(obj) = issue.as_object() else { continue };
            let rule_id = str_field(obj, &["rule_id"]);
            if rule_id.is_empty() {
                continue;
            }
            let path = str_field(obj, &["file"]);
            let line = tolerant_line_number(obj.get("line"));
            let message = str_field(obj, &["details"]);
            let severity = Severity::normalize(&str_field(obj, &["severity"]));
            let confidence = str_field(obj, &["confidence"]);

            let id = fingerprint("gosec", &rule_id, &path, line, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id,
                severity,
                "gosec",
                "2.21",
                Location::new(path, line),
                message,
            )
            .tags(vec!["sast".to_string(), "go".to_string()])
            .context(serde_json::json!({"confidence": confidence}))
            .raw(issue.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(GosecAdapter)
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
    fn parses_basic_issue() {
        let adapter = GosecAdapter;
        let f = write_fixture(
            r#"{"Issues": [{"rule_id": "G101", "severity": "HIGH", "confidence": "MEDIUM", "details": "Potential hardcoded credentials", "file": "main.go", "line": "42"}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].location.start_line, 42);
    }

    #[test]
    fn missing_file_returns_empty() {
        let adapter = GosecAdapter;
        assert!(adapter.parse(Path::new("/nope.json")).is_empty());
    }
}
