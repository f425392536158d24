use vigil_types::Finding;

fn str_context_field(finding: &Finding, key: &str) -> Option<String> {
    finding
        .context
        .as_ref()?
        .get(key)?
        .as_str()
        .map(String::from)
        .filter(|s| !s.is_empty())
}

/// Annotates Trivy findings with package-location data pulled from a Syft
/// SBOM run over the same target. Matches on `artifact_purl` first, falling
/// back to `(package name, package version)` when either side lacks a PURL.
///
/// Never touches `id`, `severity`, `rule_id`, or `message`. A Trivy finding
/// with no matching Syft component is returned unchanged.
pub fn enrich_trivy_with_syft(findings: Vec<Finding>) -> Vec<Finding> {
    let syft_entries: Vec<Finding> = findings.iter().filter(|f| f.tool.name == "syft").cloned().collect();
    if syft_entries.is_empty() {
        return findings;
    }

    findings
        .into_iter()
        .map(|mut finding| {
            if finding.tool.name != "trivy" {
                return finding;
            }
            let trivy_purl = str_context_field(&finding, "artifact_purl");
            let trivy_name = str_context_field(&finding, "package_name");
            let trivy_version = str_context_field(&finding, "package_version");

            let matched = syft_entries.iter().find(|syft| {
                let syft_purl = str_context_field(syft, "artifact_purl");
                if let (Some(tp), Some(sp)) = (&trivy_purl, &syft_purl) {
                    return tp == sp;
                }
                let syft_name = str_context_field(syft, "artifact_name");
                let syft_version = str_context_field(syft, "artifact_version");
                matches!((&trivy_name, &syft_name), (Some(a), Some(b)) if a == b)
                    && matches!((&trivy_version, &syft_version), (Some(a), Some(b)) if a == b)
            });

            if let Some(syft) = matched {
                let mut context = finding.context.clone().unwrap_or_else(|| serde_json::json!({}));
                if let Some(obj) = context.as_object_mut() {
                    obj.insert("package_path".to_string(), serde_json::Value::String(syft.location.path.clone()));
                    if let Some(purl) = str_context_field(syft, "artifact_purl") {
                        obj.insert("purl".to_string(), serde_json::Value::String(purl));
                    }
                }
                finding.context = Some(context);
                finding.references.push(format!("sbom:syft#{}", syft.location.path));
            }
            finding
        })
        .collect()
}
