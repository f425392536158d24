use crate::fingerprint::fingerprint;
use crate::json_util::{for_each_ndjson_line, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "prowler",
    version: "1.0.0",
    tool_name: "prowler",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "ndjson",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct ProwlerAdapter;

impl AdapterPlugin for ProwlerAdapter {
    fn metadata(&self) -> &'static PluginMetadata {
        &METADATA
    }

    fn parse(&self, output_path: &Path) -> Vec<Finding> {
        let limits = ResourceLimits::default();
        let Some(raw) = read_bounded(output_path, &limits) else {
            return Vec::new();
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();
        let skipped = for_each_ndjson_line(&raw, |value| {
            let Some(obj) = value.as_object() else { return };
            let status = str_field(obj, &["Status", "status"]);
            // Only failing checks are emitted as findings; PASS is dropped.
            if status != "FAIL" {
                return;
            }
            let rule_id = str_field(obj, &["CheckID", "check_id"]);
            if rule_id.is_empty() {
                return;
            }
            let resource = str_field(obj, &["ResourceId", "resource_id", "Resource"]);
            let path = if resource.is_empty() {
                format!("arn:unknown/{rule_id}")
            } else {
                resource
            };
            let message = str_field(obj, &["StatusExtended", "Message", "status_extended"]);
            let severity = Severity::normalize(&str_field(obj, &["Severity", "severity"]));

            let id = fingerprint("prowler", &rule_id, &path, 0, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id.clone(),
                severity,
                "prowler",
                "4.0",
                Location::new(path, 0),
                message.clone(),
            )
            .description(message)
            .tags(vec!["cloud-security".to_string()])
            .raw(value.clone())
            .build();

            out.push(finding);
        });
        if skipped > 0 {
            tracing::debug!(adapter = "prowler", skipped, "skipped malformed NDJSON lines");
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(ProwlerAdapter)
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
    fn drops_pass_keeps_fail() {
        let adapter = ProwlerAdapter;
        let f = write_fixture(concat!(
            r#"{"CheckID": "iam_1", "Status": "FAIL", "Severity": "high", "StatusExtended": "root has access keys", "ResourceId": "arn:aws:iam::1:root"}"#,
            "\n",
            r#"{"CheckID": "iam_2", "Status": "PASS", "Severity": "high", "StatusExtended": "mfa enabled", "ResourceId": "arn:aws:iam::1:user/a"}"#,
            "\n",
            r#"{"CheckID": "s3_1", "Status": "FAIL", "Severity": "medium", "StatusExtended": "bucket public", "ResourceId": "arn:aws:s3:::bucket"}"#,
            "\n",
        ));
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.rule_id != "iam_2"));
    }
}
