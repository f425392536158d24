use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Remediation, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "trivy_rbac",
    version: "1.0.0",
    tool_name: "trivy-rbac",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct TrivyRbacAdapter;

impl AdapterPlugin for TrivyRbacAdapter {
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
            tracing::warn!(adapter = "trivy_rbac", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(results) = data.get("Results").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for result in results {
            let Some(result_obj) = result.as_object() else { continue };
            let target = str_field(result_obj, &["Target"]);
            let Some(misconfigs) = result_obj.get("Misconfigurations").and_then(|v| v.as_array()) else { continue };

            for misconfig in misconfigs {
                let Some(obj) = misconfig.as_object() else { continue };
                let rule_id = str_field(obj, &["ID"]);
                if rule_id.is_empty() {
                    continue;
                }
                let title = str_field(obj, &["Title"]);
                let description = str_field(obj, &["Description"]);
                let resolution = str_field(obj, &["Resolution"]);
                let severity = Severity::normalize(&str_field(obj, &["Severity"]));
                let message = if title.is_empty() { description.clone() } else { title.clone() };

                let id = fingerprint("trivy_rbac", &rule_id, &target, 0, &message);
                let mut builder = FindingBuilder::new(
                    id,
                    rule_id,
                    severity,
                    "trivy-rbac",
                    "0.55",
                    Location::new(target.clone(), 0),
                    message,
                )
                .title(title)
                .description(description)
                .tags(vec!["k8s-security".to_string(), "rbac".to_string()])
                .raw(misconfig.clone());

                if !resolution.is_empty() {
                    builder = builder.remediation(Remediation::Text(resolution));
                }

                out.push(builder.build());
            }
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(TrivyRbacAdapter)
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
    fn parses_rbac_misconfiguration() {
        let adapter = TrivyRbacAdapter;
        let f = write_fixture(
            r#"{"Results": [{"Target": "ClusterRoleBinding/cluster-admin-binding", "Misconfigurations": [{"ID": "KSV047", "Title": "Default service account is actively used", "Severity": "HIGH", "Description": "...", "Resolution": "Create a dedicated service account"}]}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert!(findings[0].tags.contains(&"rbac".to_string()));
    }
}
