use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field, tolerant_line_number};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Risk, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "bearer",
    version: "1.0.0",
    tool_name: "bearer",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct BearerAdapter;

const SEVERITY_KEYS: &[&str] = &["critical", "high", "medium", "low", "warning"];

impl AdapterPlugin for BearerAdapter {
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
            tracing::warn!(adapter = "bearer", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(top) = data.as_object() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for key in SEVERITY_KEYS {
            let Some(items) = top.get(*key).and_then(|v| v.as_array()) else { continue };
            let severity = Severity::normalize(key);
            for item in items {
                let Some(obj) = item.as_object() else { continue };
                let rule_id = str_field(obj, &["id", "rule_id"]);
                if rule_id.is_empty() {
                    continue;
                }
                let path = str_field(obj, &["filename"]);
                let line = tolerant_line_number(obj.get("line_number"));
                let title = str_field(obj, &["title"]);
                let description = str_field(obj, &["description"]);
                let message = if title.is_empty() { description.clone() } else { title.clone() };
                let cwe = obj
                    .get("cwe_ids")
                    .and_then(|v| v.as_array())
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|v| v.as_str())
                            .map(|s| format!("CWE-{s}"))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();

                let id = fingerprint("bearer", &rule_id, &path, line, &message);
                let finding = FindingBuilder::new(
                    id,
                    rule_id,
                    severity,
                    "bearer",
                    "1.47",
                    Location::new(path, line),
                    message,
                )
                .title(title)
                .description(description)
                .tags(vec!["sast".to_string(), "privacy".to_string()])
                .risk(Risk { cwe, ..Risk::default() })
                .raw(item.clone())
                .build();

                out.push(finding);
            }
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(BearerAdapter)
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
    fn groups_by_severity_key() {
        let adapter = BearerAdapter;
        let f = write_fixture(
            r#"{"critical": [{"id": "ruby_lang_logger", "title": "Sensitive data logged", "filename": "app.rb", "line_number": 12, "cwe_ids": ["532"]}], "low": []}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].risk.as_ref().unwrap().cwe, vec!["CWE-532"]);
    }
}
