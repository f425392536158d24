use std::path::Path;
use vigil_types::{Finding, PluginMetadata};

/// The single seam every scanner adapter implements.
///
/// Unlike a multi-trait provider split, normalization here has exactly one
/// axis of variation (how to read one tool's output file), so one trait
/// covers discovery, parsing, and identity.
pub trait AdapterPlugin: Send + Sync {
    /// Cheap, side-effect-free metadata describing this adapter.
    fn metadata(&self) -> &'static PluginMetadata;

    /// Read `output_path` and return normalized findings.
    ///
    /// Never panics and never returns `Err` for malformed tool output —
    /// missing files, empty files, malformed JSON, and bad records are all
    /// absorbed locally and reported as an empty or partial result, per the
    /// adapter error model. Logs at debug/warning on recoverable anomalies.
    fn parse(&self, output_path: &Path) -> Vec<Finding>;

    /// Whether this adapter can make sense of `output_path` at all.
    ///
    /// The default implementation is "the file exists and parsing it
    /// doesn't panic"; adapters rarely need to override this.
    fn validate(&self, output_path: &Path) -> bool {
        output_path.exists()
    }
}
