use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "syft",
    version: "1.0.0",
    tool_name: "syft",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean")],
};

pub struct SyftAdapter;

// Syft is an SBOM generator, not a vulnerability scanner: it reports the
// software inventory at Info severity so the inventory is visible in the
// aggregated finding set and so `context.artifact_purl` is available for
// cross-tool enrichment of Grype/Trivy matches keyed on the same package.
impl AdapterPlugin for SyftAdapter {
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
            tracing::warn!(adapter = "syft", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(artifacts) = data.get("artifacts").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for artifact in artifacts {
            let Some(obj) = artifact.as_object() else { continue };
            let name = str_field(obj, &["name"]);
            if name.is_empty() {
                continue;
            }
            let version = str_field(obj, &["version"]);
            let artifact_type = str_field(obj, &["type"]);
            let purl = str_field(obj, &["purl"]);
            let rule_id = format!("sbom-component:{name}");
            let message = format!("{name}@{version} ({artifact_type}) present in software inventory");

            let id = fingerprint("syft", &rule_id, &name, 0, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id,
                Severity::Info,
                "syft",
                "1.18",
                Location::new(name.clone(), 0),
                message,
            )
            .tags(vec!["sbom".to_string(), "inventory".to_string()])
            .context(serde_json::json!({
                "artifact_purl": purl,
                "artifact_name": name,
                "artifact_version": version,
                "artifact_type": artifact_type,
            }))
            .raw(artifact.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(SyftAdapter)
}
