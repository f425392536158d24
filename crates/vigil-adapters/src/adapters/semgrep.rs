use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "semgrep",
    version: "1.0.0",
    tool_name: "semgrep",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct SemgrepAdapter;

impl AdapterPlugin for SemgrepAdapter {
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
            tracing::warn!(adapter = "semgrep", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(results) = data.get("results").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for item in results {
            let Some(obj) = item.as_object() else { continue };
            let rule_id = str_field(obj, &["check_id"]);
            if rule_id.is_empty() {
                continue;
            }
            let path = str_field(obj, &["path"]);
            let line = obj
                .get("start")
                .and_then(|v| v.get("line"))
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32;
            let end_line = obj
                .get("end")
                .and_then(|v| v.get("line"))
                .and_then(|v| v.as_u64())
                .map(|n| n as u32);

            let extra = obj.get("extra").and_then(|v| v.as_object());
            let message = extra.map(|e| str_field(e, &["message"])).unwrap_or_default();
            let severity_raw = extra
                .and_then(|e| e.get("severity"))
                .and_then(|v| v.as_str())
                .unwrap_or("INFO");
            let severity = Severity::normalize(severity_raw);

            let id = fingerprint("semgrep", &rule_id, &path, line, &message);
            let mut location = Location::new(path.clone(), line);
            location.end_line = end_line;

            let finding = FindingBuilder::new(
                id,
                rule_id.clone(),
                severity,
                "semgrep",
                "1.0",
                location,
                message.clone(),
            )
            .description(message)
            .tags(vec!["sast".to_string()])
            .raw(item.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(SemgrepAdapter)
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
    fn maps_warning_and_info_severities() {
        let adapter = SemgrepAdapter;
        let f = write_fixture(
            r#"{"results": [
                {"check_id": "rule-a", "path": "a.py", "start": {"line": 1}, "end": {"line": 1}, "extra": {"message": "warn msg", "severity": "WARNING"}},
                {"check_id": "rule-b", "path": "b.py", "start": {"line": 2}, "end": {"line": 2}, "extra": {"message": "info msg", "severity": "INFO"}}
            ]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[1].severity, Severity::Low);
    }

    #[test]
    fn missing_file_returns_empty() {
        let adapter = SemgrepAdapter;
        assert!(adapter.parse(Path::new("/nope.json")).is_empty());
    }
}
