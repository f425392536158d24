use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "aflplusplus",
    version: "1.0.0",
    tool_name: "afl++",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "crashes")],
};

pub struct AflplusplusAdapter;

fn severity_from_exploitability(exploitable: &str) -> Severity {
    match exploitable.to_ascii_uppercase().as_str() {
        "EXPLOITABLE" => Severity::Critical,
        "PROBABLY_EXPLOITABLE" => Severity::High,
        "PROBABLY_NOT_EXPLOITABLE" => Severity::Medium,
        "" => Severity::Medium,
        other => Severity::normalize(other),
    }
}

impl AdapterPlugin for AflplusplusAdapter {
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
            tracing::warn!(adapter = "aflplusplus", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(crashes) = data.get("crashes").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for crash in crashes {
            let Some(obj) = crash.as_object() else { continue };
            let path = str_field(obj, &["path", "file"]);
            if path.is_empty() {
                continue;
            }
            let signal = obj.get("signal").and_then(|v| v.as_i64()).unwrap_or(0);
            let exploitable = str_field(obj, &["exploitable"]);
            let severity = severity_from_exploitability(&exploitable);
            let crash_id = str_field(obj, &["id"]);
            let rule_id = if crash_id.is_empty() { format!("afl-crash-signal-{signal}") } else { crash_id };
            let message = format!("AFL++ reproducer crashes target with signal {signal}");

            let id = fingerprint("aflplusplus", &rule_id, &path, 0, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id,
                severity,
                "afl++",
                "4.21c",
                Location::new(path, 0),
                message,
            )
            .tags(vec!["fuzzing".to_string(), "memory-safety".to_string()])
            .context(serde_json::json!({"signal": signal, "exploitable": exploitable}))
            .raw(crash.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(AflplusplusAdapter)
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
    fn exploitable_crash_is_critical() {
        let adapter = AflplusplusAdapter;
        let f = write_fixture(
            r#"{"crashes": [{"id": "crash-001", "path": "out/crashes/id:000000", "signal": 11, "exploitable": "EXPLOITABLE"}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[test]
    fn missing_crashes_key_returns_empty() {
        let adapter = AflplusplusAdapter;
        let f = write_fixture(r#"{"stats": {}}"#);
        assert!(adapter.parse(f.path()).is_empty());
    }
}
