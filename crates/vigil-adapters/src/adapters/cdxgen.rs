use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "cdxgen",
    version: "1.0.0",
    tool_name: "cdxgen",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean")],
};

pub struct CdxgenAdapter;

// cdxgen emits a CycloneDX SBOM (`components`), mirroring how the Syft
// adapter treats inventory generation: one Info-severity finding per
// component, carrying the component's PURL forward for later enrichment.
impl AdapterPlugin for CdxgenAdapter {
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
            tracing::warn!(adapter = "cdxgen", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(components) = data.get("components").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for component in components {
            let Some(obj) = component.as_object() else { continue };
            let name = str_field(obj, &["name"]);
            if name.is_empty() {
                continue;
            }
            let version = str_field(obj, &["version"]);
            let component_type = str_field(obj, &["type"]);
            let purl = str_field(obj, &["purl"]);
            let rule_id = format!("sbom-component:{name}");
            let message = format!("{name}@{version} ({component_type}) present in software inventory");

            let id = fingerprint("cdxgen", &rule_id, &name, 0, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id,
                Severity::Info,
                "cdxgen",
                "10.10",
                Location::new(name.clone(), 0),
                message,
            )
            .tags(vec!["sbom".to_string(), "inventory".to_string()])
            .context(serde_json::json!({
                "artifact_purl": purl,
                "artifact_name": name,
                "artifact_version": version,
                "artifact_type": component_type,
            }))
            .raw(component.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(CdxgenAdapter)
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
    fn emits_info_finding_per_component() {
        let adapter = CdxgenAdapter;
        let f = write_fixture(
            r#"{"components": [{"name": "lodash", "version": "4.17.21", "type": "library", "purl": "pkg:npm/lodash@4.17.21"}]}"#,
        );
        let findings = adapter.parse(f.path());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn missing_components_key_returns_empty() {
        let adapter = CdxgenAdapter;
        let f = write_fixture(r#"{"bomFormat": "CycloneDX"}"#);
        assert!(adapter.parse(f.path()).is_empty());
    }
}
