use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Risk, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "bandit",
    version: "1.0.0",
    tool_name: "bandit",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct BanditAdapter;

impl AdapterPlugin for BanditAdapter {
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
            tracing::warn!(adapter = "bandit", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(results) = data.get("results").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for item in results {
            let Some(obj) = item.as_object() else { continue };
            let rule_id = str_field(obj, &["test_id"]);
            if rule_id.is_empty() {
                continue;
            }
            let path = str_field(obj, &["filename"]);
            let line = obj.get("line_number").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
            let message = str_field(obj, &["issue_text"]);
            let severity = Severity::normalize(&str_field(obj, &["issue_severity"]));
            let cwe = obj
                .get("issue_cwe")
                .and_then(|v| v.get("id"))
                .and_then(|v| v.as_u64())
                .map(|id| format!("CWE-{id}"));

            let id = fingerprint("bandit", &rule_id, &path, line, &message);
            let mut builder = FindingBuilder::new(
                id,
                rule_id.clone(),
                severity,
                "bandit",
                "1.7.0",
                Location::new(path, line),
                message.clone(),
            )
            .title(str_field(obj, &["test_name"]))
            .description(message)
            .tags(vec!["sast".to_string(), "python".to_string()])
            .raw(item.clone());

            if let Some(cwe) = cwe {
                builder = builder.risk(Risk {
                    cwe: vec![cwe],
                    ..Risk::default()
                });
            }

            out.push(builder.build());
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(BanditAdapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use std::io::Write;

    fn write_fixture(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{contents}").unwrap();
        f
    }

    #[test]
    fn missing_file_returns_empty() {
        let adapter = BanditAdapter;
        assert!(adapter.parse(Path::new("/nope.json")).is_empty());
    }

    #[test]
    fn empty_file_returns_empty() {
        let adapter = BanditAdapter;
        let f = write_fixture("");
        assert!(adapter.parse(f.path()).is_empty());
    }

    #[test]
    fn malformed_json_returns_empty() {
        let adapter = BanditAdapter;
        let f = write_fixture("not json");
        assert!(adapter.parse(f.path()).is_empty());
    }

    #[test]
    fn parses_basic_finding_with_sast_and_python_tags() {
        let adapter = BanditAdapter;
        let f = write_fixture(
            r#"{"results": [{"test_id": "B101", "test_name": "assert_used", "issue_severity": "LOW", "filename": "app.py", "line_number": 10, "issue_text": "Use of assert detected."}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.rule_id, "B101");
        assert_eq!(finding.severity, Severity::Low);
        assert!(finding.tags.contains(&"sast".to_string()));
        assert!(finding.tags.contains(&"python".to_string()));
        assert_eq!(finding.location.path, "app.py");
        assert_eq!(finding.location.start_line, 10);
    }
}
