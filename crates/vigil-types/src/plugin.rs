use std::collections::BTreeMap;

/// Static description of an adapter, independent of any particular run.
#[derive(Debug, Clone)]
pub struct PluginMetadata {
    /// Registration key; also the emitted `Finding.tool.name`.
    pub name: &'static str,
    /// Adapter implementation version, independent of the underlying tool's version.
    pub version: &'static str,
    /// Human label for the underlying tool.
    pub tool_name: &'static str,
    /// Always `vigil_types::SCHEMA_VERSION`; kept on the struct so callers can assert it.
    pub schema_version: &'static str,
    /// `"json"` or `"ndjson"`.
    pub output_format: &'static str,
    /// Exit code -> label, informational only.
    pub exit_codes: &'static [(i32, &'static str)],
}

impl PluginMetadata {
    pub fn exit_code_map(&self) -> BTreeMap<i32, &'static str> {
        self.exit_codes.iter().copied().collect()
    }
}
