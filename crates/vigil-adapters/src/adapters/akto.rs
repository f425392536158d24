use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "akto",
    version: "1.0.0",
    tool_name: "akto",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct AktoAdapter;

impl AdapterPlugin for AktoAdapter {
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
            tracing::warn!(adapter = "akto", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(issues) = data.get("issues").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for issue in issues {
            let Some(obj) = issue.as_object() else { continue };
            let rule_id = str_field(obj, &["id", "testName"]);
            if rule_id.is_empty() {
                continue;
            }
            let url = str_field(obj, &["url", "endpoint"]);
            let method = str_field(obj, &["method"]);
            let description = str_field(obj, &["description"]);
            let category = str_field(obj, &["category"]);
            let severity = Severity::normalize(&str_field(obj, &["severity"]));
            let message = if method.is_empty() {
                format!("{rule_id}: {description}")
            } else {
                format!("{method} {url}: {description}")
            };

            let id = fingerprint("akto", &rule_id, &url, 0, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id,
                severity,
                "akto",
                "1.0",
                Location::new(url, 0),
                message,
            )
            .description(description)
            .tags(vec!["api-security".to_string(), "dast".to_string()])
            .context(serde_json::json!({"category": category, "method": method}))
            .raw(issue.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(AktoAdapter)
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
    fn parses_api_issue() {
        let adapter = AktoAdapter;
        let f = write_fixture(
            r#"{"issues": [{"id": "BOLA-1", "url": "/api/users/1", "method": "GET", "description": "Broken object level authorization", "category": "authorization", "severity": "HIGH"}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].location.path, "/api/users/1");
    }
}
