use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "semgrep_secrets",
    version: "1.0.0",
    tool_name: "semgrep-secrets",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

/// Secrets-specific Semgrep ruleset output, distinct from the general
/// `semgrep` adapter because secret detections default to a higher
/// severity floor than ordinary SAST findings.
pub struct SemgrepSecretsAdapter;

impl AdapterPlugin for SemgrepSecretsAdapter {
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
            tracing::warn!(adapter = "semgrep_secrets", path = %output_path.display(), "malformed JSON");
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

            let extra = obj.get("extra").and_then(|v| v.as_object());
            let message = extra.map(|e| str_field(e, &["message"])).unwrap_or_default();
            let severity_token = extra
                .and_then(|e| e.get("severity"))
                .and_then(|v| v.as_str())
                .unwrap_or("ERROR");
            let severity = match severity_token.to_ascii_uppercase().as_str() {
                "ERROR" => Severity::Critical,
                "WARNING" => Severity::High,
                _ => Severity::Medium,
            };

            let id = fingerprint("semgrep_secrets", &rule_id, &path, line, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id.clone(),
                severity,
                "semgrep-secrets",
                "1.0",
                Location::new(path, line),
                message.clone(),
            )
            .description(message)
            .tags(vec!["secret".to_string(), "sast".to_string()])
            .raw(item.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(SemgrepSecretsAdapter)
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
    fn error_token_defaults_to_critical() {
        let adapter = SemgrepSecretsAdapter;
        let f = write_fixture(
            r#"{"results": [{"check_id": "generic.secrets.aws-key", "path": "x.env", "start": {"line": 3}, "extra": {"message": "hardcoded key", "severity": "ERROR"}}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].tags.contains(&"secret".to_string()));
    }
}
