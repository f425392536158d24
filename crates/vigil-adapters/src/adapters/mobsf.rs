use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Risk, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "mobsf",
    version: "1.0.0",
    tool_name: "mobsf",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct MobsfAdapter;

impl AdapterPlugin for MobsfAdapter {
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
            tracing::warn!(adapter = "mobsf", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };

        let mut out = Vec::new();
        out.extend(parse_code_analysis(&data));
        out.extend(parse_manifest_analysis(&data));
        out
    }
}

/// `code_analysis` is a dict keyed by finding key, each entry carrying
/// `metadata.{description,severity,cwe,owasp-mobile,masvs}` and a `files`
/// list whose entries provide `match_position` (used as the reported line).
fn parse_code_analysis(data: &Value) -> Vec<Finding> {
    let Some(map) = data.get("code_analysis").and_then(|v| v.as_object()) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (finding_key, entry) in map {
        let Some(entry_obj) = entry.as_object() else { continue };
        let metadata = entry_obj.get("metadata").and_then(|v| v.as_object());
        let description = metadata.map(|m| str_field(m, &["description"])).unwrap_or_default();
        let severity = Severity::normalize(&metadata.map(|m| str_field(m, &["severity"])).unwrap_or_default());
        let cwe = metadata
            .and_then(|m| m.get("cwe"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .into_iter()
            .collect::<Vec<_>>();
        let owasp_mobile = metadata.and_then(|m| m.get("owasp-mobile")).and_then(|v| v.as_str());
        let masvs = metadata.and_then(|m| m.get("masvs")).and_then(|v| v.as_str());

        let files = entry_obj.get("files").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        if files.is_empty() {
            let message = if description.is_empty() { finding_key.clone() } else { description.clone() };
            let id = fingerprint("mobsf", finding_key, "", 0, &message);
            let finding = FindingBuilder::new(
                id,
                finding_key.clone(),
                severity,
                "mobsf",
                "3.9",
                Location::new(String::new(), 0),
                message,
            )
            .description(description)
            .tags(vec!["mobile-security".to_string(), "sast".to_string()])
            .risk(Risk { cwe, ..Risk::default() })
            .context(serde_json::json!({
                "owasp_mobile": owasp_mobile,
                "masvs": masvs,
            }))
            .raw(entry.clone())
            .build();
            out.push(finding);
            continue;
        }

        for file in &files {
            let Some(file_obj) = file.as_object() else { continue };
            let path = str_field(file_obj, &["file_path", "file"]);
            let line = file_obj
                .get("match_position")
                .and_then(|v| v.as_array())
                .and_then(|arr| arr.first())
                .and_then(|v| v.as_i64())
                .unwrap_or(0) as u32;
            let message = if description.is_empty() { finding_key.clone() } else { description.clone() };

            let id = fingerprint("mobsf", finding_key, &path, line, &message);
            let finding = FindingBuilder::new(
                id,
                finding_key.clone(),
                severity,
                "mobsf",
                "3.9",
                Location::new(path, line),
                message,
            )
            .description(description.clone())
            .tags(vec!["mobile-security".to_string(), "sast".to_string()])
            .risk(Risk { cwe: cwe.clone(), ..Risk::default() })
            .context(serde_json::json!({
                "owasp_mobile": owasp_mobile,
                "masvs": masvs,
            }))
            .raw(file.clone())
            .build();
            out.push(finding);
        }
    }
    out
}

/// `manifest_analysis` is keyed by finding key, each entry carrying
/// `severity`/`title`/`description`. Entries with severity `SECURE` are
/// informational passes and are skipped.
fn parse_manifest_analysis(data: &Value) -> Vec<Finding> {
    let Some(map) = data.get("manifest_analysis").and_then(|v| v.as_object()) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (finding_key, entry) in map {
        let Some(entry_obj) = entry.as_object() else { continue };
        let raw_severity = str_field(entry_obj, &["severity"]);
        if raw_severity.eq_ignore_ascii_case("secure") {
            continue;
        }
        let title = str_field(entry_obj, &["title"]);
        let description = str_field(entry_obj, &["description"]);
        let severity = Severity::normalize(&raw_severity);
        let message = if title.is_empty() { finding_key.clone() } else { title.clone() };

        let id = fingerprint("mobsf", finding_key, "AndroidManifest.xml", 0, &message);
        let finding = FindingBuilder::new(
            id,
            finding_key.clone(),
            severity,
            "mobsf",
            "3.9",
            Location::new("AndroidManifest.xml".to_string(), 0),
            message,
        )
        .title(title)
        .description(description)
        .tags(vec![
            "mobile-security".to_string(),
            "manifest".to_string(),
            "configuration".to_string(),
        ])
        .raw(entry.clone())
        .build();
        out.push(finding);
    }
    out
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(MobsfAdapter)
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
    fn code_analysis_emits_one_finding_per_file() {
        let adapter = MobsfAdapter;
        let f = write_fixture(
            r#"{"code_analysis": {"android_logging": {"metadata": {"description": "Logging sensitive data", "severity": "warning", "cwe": "CWE-532"}, "files": [{"file_path": "MainActivity.java", "match_position": [10, 0]}]}}}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location.path, "MainActivity.java");
        assert_eq!(findings[0].location.start_line, 10);
        assert_eq!(findings[0].risk.as_ref().unwrap().cwe, vec!["CWE-532"]);
    }

    #[test]
    fn manifest_analysis_skips_secure_entries() {
        let adapter = MobsfAdapter;
        let f = write_fixture(
            r#"{"manifest_analysis": {
                "ok": {"severity": "secure", "title": "fine", "description": "fine"},
                "cleartext": {"severity": "high", "title": "Cleartext traffic allowed", "description": "usesCleartextTraffic is true"}
            }}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert!(findings[0].tags.contains(&"manifest".to_string()));
    }
}
