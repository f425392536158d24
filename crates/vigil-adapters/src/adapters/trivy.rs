use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Cvss, Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "trivy",
    version: "1.0.0",
    tool_name: "trivy",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct TrivyAdapter;

fn extract_cvss(vuln: &serde_json::Map<String, serde_json::Value>) -> Option<Cvss> {
    let cvss_obj = vuln.get("CVSS")?.as_object()?;
    // Trivy nests CVSS data per data source (nvd, redhat, ...); prefer nvd.
    let source = cvss_obj.get("nvd").or_else(|| cvss_obj.values().next())?.as_object()?;
    let score = source
        .get("V3Score")
        .or_else(|| source.get("V2Score"))
        .and_then(|v| v.as_f64())?;
    let vector = source
        .get("V3Vector")
        .or_else(|| source.get("V2Vector"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let version = if source.contains_key("V3Score") { "3.x" } else { "2.0" };
    Some(Cvss { version: version.to_string(), score, vector })
}

impl AdapterPlugin for TrivyAdapter {
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
            tracing::warn!(adapter = "trivy", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(results) = data.get("Results").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for result in results {
            let Some(result_obj) = result.as_object() else { continue };
            let target = str_field(result_obj, &["Target"]);
            let Some(vulns) = result_obj.get("Vulnerabilities").and_then(|v| v.as_array()) else { continue };

            for vuln in vulns {
                let Some(vuln_obj) = vuln.as_object() else { continue };
                let rule_id = str_field(vuln_obj, &["VulnerabilityID"]);
                if rule_id.is_empty() {
                    continue;
                }
                let pkg_name = str_field(vuln_obj, &["PkgName"]);
                let installed_version = str_field(vuln_obj, &["InstalledVersion"]);
                let description = str_field(vuln_obj, &["Description", "Title"]);
                let cvss = extract_cvss(vuln_obj);
                let severity = cvss
                    .as_ref()
                    .map(|c| Severity::from_cvss_score(c.score))
                    .unwrap_or_else(|| Severity::normalize(&str_field(vuln_obj, &["Severity"])));
                let purl = vuln_obj
                    .get("PkgIdentifier")
                    .and_then(|v| v.get("PURL"))
                    .and_then(|v| v.as_str());
                let message = format!("{rule_id} affects {pkg_name}@{installed_version} in {target}");

                let id = fingerprint("trivy", &rule_id, &target, 0, &message);
                let mut builder = FindingBuilder::new(
                    id,
                    rule_id,
                    severity,
                    "trivy",
                    "0.55",
                    Location::new(target.clone(), 0),
                    message,
                )
                .description(description)
                .tags(vec!["sca".to_string(), "cve".to_string()])
                .raw(vuln.clone());

                if let Some(cvss) = cvss {
                    builder = builder.cvss(cvss);
                }
                let mut context = serde_json::json!({
                    "package_name": pkg_name,
                    "package_version": installed_version,
                });
                if let Some(purl) = purl {
                    context["artifact_purl"] = serde_json::Value::String(purl.to_string());
                }
                builder = builder.context(context);

                out.push(builder.build());
            }
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(TrivyAdapter)
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
    fn prefers_nvd_cvss_v3() {
        let adapter = TrivyAdapter;
        let f = write_fixture(
            r#"{"Results": [{"Target": "app/package-lock.json", "Vulnerabilities": [{"VulnerabilityID": "CVE-2022-1234", "PkgName": "minimist", "InstalledVersion": "1.2.0", "Severity": "HIGH", "CVSS": {"nvd": {"V3Score": 9.1, "V3Vector": "CVSS:3.1/AV:N"}}}]}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].cvss.as_ref().unwrap().score, 9.1);
        assert_eq!(findings[0].cvss.as_ref().unwrap().version, "3.x");
        assert_eq!(findings[0].severity, Severity::Critical);
    }
}
