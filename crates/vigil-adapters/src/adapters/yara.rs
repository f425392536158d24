use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "yara",
    version: "1.0.0",
    tool_name: "yara",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "matches")],
};

pub struct YaraAdapter;

fn infer_severity(meta_severity: &str, rule_tags: &[String]) -> Severity {
    if !meta_severity.is_empty() {
        return Severity::normalize(meta_severity);
    }
    let lower: Vec<String> = rule_tags.iter().map(|t| t.to_ascii_lowercase()).collect();
    if lower.iter().any(|t| matches!(t.as_str(), "critical" | "apt" | "ransomware" | "backdoor")) {
        Severity::Critical
    } else if lower.iter().any(|t| matches!(t.as_str(), "high" | "webshell" | "trojan" | "exploit")) {
        Severity::High
    } else if lower.iter().any(|t| matches!(t.as_str(), "medium" | "suspicious")) {
        Severity::Medium
    } else {
        // Malware detection defaults to HIGH in the absence of other signal.
        Severity::High
    }
}

impl AdapterPlugin for YaraAdapter {
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
            tracing::warn!(adapter = "yara", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };

        // A single match object or an array of matches are both accepted.
        let matches: Vec<serde_json::Value> = match data {
            serde_json::Value::Object(_) => vec![data],
            serde_json::Value::Array(items) => items,
            _ => return Vec::new(),
        };

        let mut out = Vec::new();
        for m in matches {
            let Some(obj) = m.as_object() else { continue };
            let rule_name = str_field(obj, &["rule"]);
            if rule_name.is_empty() {
                continue;
            }
            let namespace = {
                let ns = str_field(obj, &["namespace"]);
                if ns.is_empty() { "default".to_string() } else { ns }
            };
            let rule_tags: Vec<String> = obj
                .get("tags")
                .and_then(|v| v.as_array())
                .map(|arr| arr.iter().filter_map(|t| t.as_str().map(String::from)).collect())
                .unwrap_or_default();
            let meta = obj.get("meta").and_then(|v| v.as_object());
            let description = meta
                .map(|m| str_field(m, &["description"]))
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| rule_name.clone());
            let meta_severity = meta.map(|m| str_field(m, &["severity"])).unwrap_or_default();
            let severity = infer_severity(&meta_severity, &rule_tags);

            let strings_matched = obj.get("strings").and_then(|v| v.as_array()).cloned().unwrap_or_default();

            let file_path = obj
                .get("scans")
                .and_then(|v| v.as_array())
                .and_then(|arr| arr.first())
                .and_then(|s| s.get("file"))
                .and_then(|v| v.as_str())
                .map(String::from)
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    let f = str_field(obj, &["file"]);
                    if f.is_empty() { None } else { Some(f) }
                })
                .unwrap_or_else(|| format!("malware:{rule_name}"));

            let mut message = format!("YARA rule '{rule_name}' matched: {description}");
            if !strings_matched.is_empty() {
                message.push_str(&format!(" ({} string matches)", strings_matched.len()));
            }

            let id = fingerprint("yara", &rule_name, &file_path, 0, &message);

            let mut tags = vec!["malware-detection".to_string(), "yara".to_string()];
            tags.extend(rule_tags.iter().map(|t| t.to_ascii_lowercase().replace(' ', "-")));
            if namespace != "default" {
                tags.push(format!("namespace:{}", namespace.to_ascii_lowercase()));
            }

            let references = meta
                .and_then(|m| {
                    let r = str_field(m, &["reference"]);
                    if r.is_empty() { None } else { Some(vec![r]) }
                })
                .unwrap_or_default();

            let finding = FindingBuilder::new(
                id,
                rule_name.clone(),
                severity,
                "yara",
                "4.3.0",
                Location::new(file_path, 0),
                message,
            )
            .title(format!("Malware Detected: {rule_name}"))
            .description(description)
            .remediation(vigil_types::Remediation::Text(format!(
                "Review file for malware indicators. YARA rule '{rule_name}' detected malicious patterns."
            )))
            .references(references)
            .tags(tags)
            .context(serde_json::json!({
                "rule_name": rule_name,
                "namespace": namespace,
                "rule_tags": rule_tags,
                "matched_strings_count": strings_matched.len(),
            }))
            .raw(serde_json::Value::Object(obj.clone()))
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(YaraAdapter)
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
    fn single_match_object_is_accepted() {
        let adapter = YaraAdapter;
        let f = write_fixture(
            r#"{"rule": "Webshell_PHP_Generic", "tags": ["webshell"], "meta": {"description": "Generic PHP webshell"}, "scans": [{"file": "/var/www/shell.php"}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].location.path, "/var/www/shell.php");
    }

    #[test]
    fn missing_file_path_falls_back_to_synthetic_path() {
        let adapter = YaraAdapter;
        let f = write_fixture(r#"{"rule": "Ransomware_Generic", "tags": ["ransomware"]}"#);
        let findings = adapter.parse(f.path());
        assert_eq!(findings[0].location.path, "malware:Ransomware_Generic");
        assert_eq!(findings[0].severity, Severity::Critical);
    }
}
