use crate::fingerprint::fingerprint;
use crate::json_util::{parse_json_bounded, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Remediation, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "zap",
    version: "1.0.0",
    tool_name: "zap",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct ZapAdapter;

// ZAP reports risk as "High (Medium)" — risk level, then confidence in
// parentheses. Only the risk level maps to severity; confidence is kept in
// context for triage.
fn severity_from_riskdesc(riskdesc: &str) -> Severity {
    let risk = riskdesc.split_whitespace().next().unwrap_or("");
    match risk.to_ascii_lowercase().as_str() {
        "high" => Severity::High,
        "medium" => Severity::Medium,
        "low" => Severity::Low,
        "informational" => Severity::Info,
        other => Severity::normalize(other),
    }
}

impl AdapterPlugin for ZapAdapter {
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
            tracing::warn!(adapter = "zap", path = %output_path.display(), "malformed JSON");
            return Vec::new();
        };
        let Some(sites) = data.get("site").and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for site in sites {
            let Some(site_obj) = site.as_object() else { continue };
            let Some(alerts) = site_obj.get("alerts").and_then(|v| v.as_array()) else { continue };

            for alert in alerts {
                let Some(obj) = alert.as_object() else { continue };
                let rule_id = str_field(obj, &["pluginid"]);
                if rule_id.is_empty() {
                    continue;
                }
                let title = str_field(obj, &["alert", "name"]);
                let description = str_field(obj, &["desc"]);
                let solution = str_field(obj, &["solution"]);
                let severity = severity_from_riskdesc(&str_field(obj, &["riskdesc"]));

                let uri = obj
                    .get("instances")
                    .and_then(|v| v.as_array())
                    .and_then(|arr| arr.first())
                    .map(|i| str_field(i.as_object().unwrap_or(&serde_json::Map::new()), &["uri"]))
                    .unwrap_or_default();
                let path = if uri.is_empty() { title.clone() } else { uri };
                let message = title.clone();

                let id = fingerprint("zap", &rule_id, &path, 0, &message);
                let mut builder = FindingBuilder::new(
                    id,
                    rule_id,
                    severity,
                    "zap",
                    "2.15",
                    Location::new(path, 0),
                    message,
                )
                .title(title)
                .description(description)
                .tags(vec!["dast".to_string()])
                .raw(alert.clone());

                if !solution.is_empty() {
                    builder = builder.remediation(Remediation::Text(solution));
                }

                out.push(builder.build());
            }
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(ZapAdapter)
}
