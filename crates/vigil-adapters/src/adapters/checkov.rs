use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field, tolerant_line_number};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "checkov",
    version: "1.0.0",
    tool_name: "checkov",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct CheckovAdapter;

const CICD_FRAMEWORKS: &[&str] = &[
    "github_actions",
    "gitlab_ci",
    "circleci_pipelines",
    "azure_pipelines",
    "bitbucket_pipelines",
    "argo_workflows",
];

impl AdapterPlugin for CheckovAdapter {
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
            tracing::warn!(adapter = "checkov", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(top_obj) = data.as_object() else {
            return Vec::new();
        };
        // check_type lives at the document top level, not per failed-check item.
        let check_type = str_field(top_obj, &["check_type"]).to_lowercase();
        let is_cicd = CICD_FRAMEWORKS.contains(&check_type.as_str());

        let Some(failed) = data
            .get("results")
            .and_then(|v| v.get("failed_checks"))
            .and_then(|v| v.as_array())
        else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for item in failed {
            let Some(obj) = item.as_object() else { continue };
            let rule_id = str_field(obj, &["check_id"]);
            if rule_id.is_empty() {
                continue;
            }
            let path = str_field(obj, &["file_path", "repo_file_path"]);
            let line = tolerant_line_number(obj.get("file_line_range"));
            let message = str_field(obj, &["check_name"]);

            // CI/CD pipeline definitions are tagged distinctly from general IaC.
            let tags = if is_cicd {
                vec!["cicd-security".to_string(), "policy".to_string()]
            } else {
                vec!["iac".to_string(), "policy".to_string()]
            };

            let id = fingerprint("checkov", &rule_id, &path, line, &message);
            let mut builder = FindingBuilder::new(
                id,
                rule_id.clone(),
                Severity::Medium,
                "checkov",
                "3.0",
                Location::new(path, line),
                message.clone(),
            )
            .description(message)
            .tags(tags)
            .raw(item.clone());

            if let Some(guideline) = obj.get("guideline").and_then(|v| v.as_str()) {
                builder = builder.references(vec![guideline.to_string()]);
            }

            out.push(builder.build());
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(CheckovAdapter)
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
    fn github_actions_check_type_gets_cicd_tag_not_iac() {
        let adapter = CheckovAdapter;
        let f = write_fixture(
            r#"{"check_type": "github_actions", "results": {"failed_checks": [{"check_id": "CKV_GHA_1", "file_path": ".github/workflows/ci.yml", "file_line_range": [1, 5], "check_name": "Ensure top-level permissions set to read-only"}]}}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].tags.contains(&"cicd-security".to_string()));
        assert!(findings[0].tags.contains(&"policy".to_string()));
        assert!(!findings[0].tags.contains(&"iac".to_string()));
    }

    #[test]
    fn other_cicd_frameworks_also_get_cicd_tag() {
        let adapter = CheckovAdapter;
        let f = write_fixture(
            r#"{"check_type": "circleci_pipelines", "results": {"failed_checks": [{"check_id": "CKV_CIRCLECI_1", "file_path": ".circleci/config.yml", "file_line_range": [1, 2], "check_name": "Ensure job has timeout"}]}}"#,
        );
        let findings = adapter.parse(f.path());
        assert!(findings[0].tags.contains(&"cicd-security".to_string()));
    }

    #[test]
    fn terraform_check_type_gets_iac_tag() {
        let adapter = CheckovAdapter;
        let f = write_fixture(
            r#"{"check_type": "terraform", "results": {"failed_checks": [{"check_id": "CKV_AWS_1", "file_path": "main.tf", "file_line_range": [1, 2], "check_name": "Ensure bucket is private"}]}}"#,
        );
        let findings = adapter.parse(f.path());
        assert!(findings[0].tags.contains(&"iac".to_string()));
    }
}
