use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Risk, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "dependency_check",
    version: "1.0.0",
    tool_name: "dependency-check",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct DependencyCheckAdapter;

impl AdapterPlugin for DependencyCheckAdapter {
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
            tracing::warn!(adapter = "dependency_check", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(dependencies) = data
            .get("dependencies")
            .and_then(|v| v.as_array())
        else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for dependency in dependencies {
            let Some(dep_obj) = dependency.as_object() else { continue };
            let path = str_field(dep_obj, &["filePath", "fileName"]);
            let Some(vulns) = dep_obj.get("vulnerabilities").and_then(|v| v.as_array()) else { continue };

            for vuln in vulns {
                let Some(vuln_obj) = vuln.as_object() else { continue };
                let rule_id = str_field(vuln_obj, &["name"]);
                if rule_id.is_empty() {
                    continue;
                }
                let description = str_field(vuln_obj, &["description"]);
                let severity = Severity::normalize(&str_field(vuln_obj, &["severity"]));
                let cwe = vuln_obj
                    .get("cwes")
                    .and_then(|v| v.as_array())
                    .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                    .unwrap_or_default();
                let message = format!("{rule_id}: {description}");

                let id = fingerprint("dependency_check", &rule_id, &path, 0, &message);
                let finding = FindingBuilder::new(
                    id,
                    rule_id,
                    severity,
                    "dependency-check",
                    "10.0",
                    Location::new(path.clone(), 0),
                    message,
                )
                .description(description)
                .tags(vec!["sca".to_string(), "cve".to_string()])
                .risk(Risk { cwe, ..Risk::default() })
                .raw(vuln.clone())
                .build();

                out.push(finding);
            }
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(DependencyCheckAdapter)
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
    fn parses_dependency_vulnerabilities() {
        let adapter = DependencyCheckAdapter;
        let f = write_fixture(
            r#"{"dependencies": [{"fileName": "log4j-core-2.14.1.jar", "filePath": "/app/lib/log4j-core-2.14.1.jar", "vulnerabilities": [{"name": "CVE-2021-44228", "severity": "CRITICAL", "description": "Log4Shell", "cwes": ["CWE-502"]}]}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].risk.as_ref().unwrap().cwe, vec!["CWE-502"]);
    }

    #[test]
    fn dependency_without_vulnerabilities_key_is_skipped() {
        let adapter = DependencyCheckAdapter;
        let f = write_fixture(r#"{"dependencies": [{"fileName": "clean.jar"}]}"#);
        assert!(adapter.parse(f.path()).is_empty());
    }
}
