use crate::fingerprint::fingerprint;
use crate::json_util::{read_bounded, str_field, tolerant_line_number};
use crate::traits::AdapterPlugin;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use vigil_core::ResourceLimits;
use vigil_types::{Finding, FindingBuilder, Location, PluginMetadata, Risk, Severity};

const METADATA: PluginMetadata = PluginMetadata {
    name: "trufflehog",
    version: "1.0.0",
    tool_name: "trufflehog",
    schema_version: vigil_types::SCHEMA_VERSION,
    output_format: "json",
    exit_codes: &[(0, "clean"), (1, "findings")],
};

pub struct TrufflehogAdapter;

impl AdapterPlugin for TrufflehogAdapter {
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

        let matches = collect_matches(raw);
        let mut out = Vec::new();
        for m in matches {
            let Some(obj) = m.as_object() else { continue };
            let detector = str_field(obj, &["DetectorName", "signature"]);
            let rule_id = if detector.is_empty() { "trufflehog".to_string() } else { detector };
            let verified = obj
                .get("Verified")
                .or_else(|| obj.get("verified"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let severity = if verified { Severity::High } else { Severity::Medium };

            let path = obj
                .get("SourceMetadata")
                .and_then(|v| v.get("Data"))
                .and_then(|v| v.get("Filesystem"))
                .and_then(|v| v.get("file"))
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| str_field(obj, &["path"]));
            let line = tolerant_line_number(
                obj.get("SourceMetadata")
                    .and_then(|v| v.get("Data"))
                    .and_then(|v| v.get("Filesystem"))
                    .and_then(|v| v.get("line"))
                    .or_else(|| obj.get("line_number")),
            );
            let message = format!("Potential secret detected by Trufflehog ({rule_id})");

            let id = fingerprint("trufflehog", &rule_id, &path, line, &message);
            let finding = FindingBuilder::new(
                id,
                rule_id,
                severity,
                "trufflehog",
                "3.0",
                Location::new(path, line),
                message,
            )
            .description("Rotate the exposed credential and purge it from history.")
            .tags(vec!["secret".to_string()])
            .risk(Risk {
                cwe: vec!["CWE-798".to_string()],
                ..Risk::default()
            })
            .raw(m.clone())
            .build();

            out.push(finding);
        }
        out
    }
}

/// Accept a bare array, a bare object, nested arrays, or NDJSON, flattening
/// to a list of objects and silently skipping anything else.
fn collect_matches(raw: &str) -> Vec<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        let mut out = Vec::new();
        flatten_into(value, &mut out);
        if !out.is_empty() {
            return out;
        }
    }

    // Fall back to NDJSON: one JSON value per line, tolerating nested arrays
    // and malformed lines (skipped, not fatal).
    let mut out = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            flatten_into(value, &mut out);
        }
    }
    out
}

fn flatten_into(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        Value::Object(_) => out.push(value),
        _ => {}
    }
}

pub fn construct() -> Arc<dyn AdapterPlugin> {
    Arc::new(TrufflehogAdapter)
}
