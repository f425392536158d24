use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "lynis",
    version: "1.0.0",
    tool_name: "lynis",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct LynisAdapter;

fn emit(
    items: &[serde_json::Value],
    kind: &str,
    default_severity: Severity,
    out: &mut Vec<Finding>,
) {
    for item in items {
        let Some(obj) = item.as_object() else { continue };
        let rule_id = str_field(obj, &["id"]);
        if rule_id.is_empty() {
            continue;
        }
        let description = str_field(obj, &["description"]);
        let details = str_field(obj, &["details"]);
        let severity = {
            let raw = str_field(obj, &["severity"]);
            if raw.is_empty() { default_severity } else { Severity::normalize(&raw) }
        };
        let message = if details.is_empty() { description.clone() } else { format!("{description} ({details})") };

        let id = fingerprint("lynis", &rule_id, "system", 0, &message);
        let finding = FindingBuilder::new(
            id,
            rule_id,
            severity,
            "lynis",
            "3.1",
            Location::new("system".to_string(), 0),
            message,
        )
        .description(description)
        .tags(vec!["system-hardening".to_string(), kind.to_string()])
        .raw(item.clone())
        .build();

        out.push(finding);
    }
}

impl AdapterPlugin for LynisAdapter {
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
            tracing::warn!(adapter = "lynis", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };

        let mut out = Vec::new();
        if let Some(warnings) = data.get("warnings").and_then(|v| v.as_array()) {
            emit(warnings, "warning", Severity::High, &mut out);
        }
        if let Some(suggestions) = data.get("suggestions").and_then(|v| v.as_array()) {
            emit(suggestions, "suggestion", Severity::Low, &mut out);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(LynisAdapter)
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
    fn warnings_default_high_suggestions_default_low() {
        let adapter = LynisAdapter;
        let f = write_fixture(
            r#"{"warnings": [{"id": "AUTH-9262", "description": "No password set for single user mode"}], "suggestions": [{"id": "KRNL-5820", "description": "Install a PAM module for password strength testing"}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().any(|f| f.severity == Severity::High));
        assert!(findings.iter().any(|f| f.severity == Severity::Low));
    }
}
