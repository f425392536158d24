//! Fixture builders for scanner-output results trees.
//!
//! Lays out `<root>/individual-repos/<target>/<tool>.<ext>` directories the
//! same way the pipeline's walker expects, so adapter and pipeline tests can
//! build a results tree in a couple of lines instead of hand-rolling
//! `fs::create_dir_all`/`fs::write` each time.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary results tree rooted at `individual-repos/`.
pub struct ResultsTree {
    _dir: TempDir,
    root: PathBuf,
}

impl ResultsTree {
    pub fn new() -> std::io::Result<Self> {
        let dir = TempDir::new()?;
        let root = dir.path().to_path_buf();
        Ok(Self { _dir: dir, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `contents` as `individual-repos/<target>/<tool>.json`.
    pub fn write_json(&self, target: &str, tool: &str, contents: &str) -> std::io::Result<PathBuf> {
        self.write(target, &format!("{tool}.json"), contents)
    }

    /// Write `contents` as `individual-repos/<target>/<tool>.ndjson`.
    pub fn write_ndjson(&self, target: &str, tool: &str, contents: &str) -> std::io::Result<PathBuf> {
        self.write(target, &format!("{tool}.ndjson"), contents)
    }

    fn write(&self, target: &str, file_name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let dir = self.root.join("individual-repos").join(target);
        fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

impl Default for ResultsTree {
    fn default() -> Self {
        Self::new().expect("failed to create temporary results tree")
    }
}

/// Minimal, well-formed bandit output: one medium-severity finding.
pub fn sample_bandit_json() -> &'static str {
    r#"{
        "results": [
            {
                "test_id": "B101",
                "issue_severity": "MEDIUM",
                "filename": "app.py",
                "line_number": 42,
                "issue_text": "Use of assert detected.",
                "issue_cwe": {"id": 703}
            }
        ]
    }"#
}

/// Malformed JSON (truncated), for negative-path adapter/pipeline tests.
pub fn malformed_json() -> &'static str {
    r#"{"results": [{"test_id": "B101", "#
}
