use crate::fingerprint::fingerprint;
use crate::json_util::{for_each_ndjson_line, read_bounded, str_field};
use crate::traits::AdapterPlugin;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "falco",
    version: "1.0.0",
    tool_name: "falco",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "ndjson",
    exit_codes: &[(0, "clean"), (1, "alerts")],
};

pub struct FalcoAdapter;

impl AdapterPlugin for FalcoAdapter {
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
            let rule_id = str_field(obj, &["rule"]);
            if rule_id.is_empty() {
                return;
            }
            let message = str_field(obj, &["output"]);
            let severity = Severity::normalize(&str_field(obj, &["priority"]));
            let container = obj
                .get("output_fields")
                .and_then(|v| v.get("container.name"))
                .and_then(|v| v.as_str())
                .unwrap_or("host");
            let path = format!("{container}/runtime-event/{rule_id}");

            let id = fingerprint("falco", &rule_id, &path, 0, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id.clone(),
                severity,
                "falco",
                "0.37",
                Location::new(path, 0),
                message.clone(),
            )
            .description(message)
            .tags(vec!["runtime-security".to_string()])
            .raw(value.clone())
            .build();

            out.push(finding);
        });
        if skipped > 0 {
            tracing::debug!(adapter = "falco", skipped, "skipped malformed NDJSON lines");
        }
        out
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(FalcoAdapter)
}
