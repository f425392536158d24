use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "scancode",
    version: "1.0.0",
    tool_name: "scancode-toolkit",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct ScancodeAdapter;

fn severity_from_category(category: &str) -> Severity {
    match category.to_ascii_lowercase().as_str() {
        "copyleft" => Severity::High,
        "copyleft limited" => Severity::Medium,
        "proprietary free" | "commercial" => Severity::High,
        "permissive" | "public domain" => Severity::Info,
        _ => Severity::Low,
    }
}

impl AdapterPlugin for ScancodeAdapter {
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
            tracing::warn!(adapter = "scancode", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(files) = data.get("files").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for file in files {
            let Some(file_obj) = file.as_object() else { continue };
            let path = str_field(file_obj, &["path"]);
            if path.is_empty() {
                continue;
            }
            let Some(licenses) = file_obj.get("licenses").and_then(|v| v.as_array()) else { continue };

            for license in licenses {
                let Some(license_obj) = license.as_object() else { continue };
                let key = str_field(license_obj, &["key"]);
                if key.is_empty() {
                    continue;
                }
                let category = str_field(license_obj, &["category"]);
                let severity = severity_from_category(&category);
                let score = license_obj.get("score").and_then(|v| v.as_f64()).unwrap_or(0.0);
                let message = format!("License '{key}' ({category}) detected in {path}");

                let id = fingerprint("scancode", &key, &path, 0, &message);
                let finding = FindingBuilder::new(
                    id,
                    key,
                    severity,
                    "scancode-toolkit",
                    "32.3",
                    Location::new(path.clone(), 0),
                    message,
                )
                .tags(vec!["license-compliance".to_string()])
                .context(serde_json::json!({"category": category, "match_score": score}))
                .raw(license.clone())
                .build();

                out.push(finding);
            }
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(ScancodeAdapter)
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
    fn copyleft_license_is_high_severity() {
        let adapter = ScancodeAdapter;
        let f = write_fixture(
            r#"{"files": [{"path": "vendor/libfoo/LICENSE", "licenses": [{"key": "gpl-3.0", "category": "Copyleft", "score": 98.5}]}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn permissive_license_is_info_severity() {
        let adapter = ScancodeAdapter;
        let f = write_fixture(
            r#"{"files": [{"path": "vendor/bar/LICENSE", "licenses": [{"key": "mit", "category": "Permissive", "score": 100.0}]}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings[0].severity, Severity::Info);
    }
}
