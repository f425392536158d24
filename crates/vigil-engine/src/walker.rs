use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One (adapter, output file) unit of work discovered under a results root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub adapter_name: String,
    pub target: String,
    pub path: PathBuf,
}

/// Walks `<root>/individual-repos/<target>/<tool>.<json|ndjson>`, yielding one
/// work unit per recognized file. Files whose stem isn't a known adapter name
/// are ignored, not treated as an error.
pub fn discover(root: &Path, known_adapters: &[&str]) -> Vec<WorkUnit> {
    let repos_root = root.join("individual-repos");
    if !repos_root.is_dir() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for target_entry in WalkDir::new(&repos_root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let target = target_entry.file_name().to_string_lossy().to_string();
        for file_entry in WalkDir::new(target_entry.path())
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = file_entry.path().to_path_buf();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else { continue };
            if !matches!(ext, "json" | "ndjson") {
                continue;
            }
            if let Some(&adapter_name) = known_adapters.iter().find(|&&n| n == stem) {
                out.push(WorkUnit {
                    adapter_name: adapter_name.to_string(),
                    target: target.clone(),
                    path,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discovers_recognized_tool_files_only() {
        let dir = tempdir().unwrap();
        let target_dir = dir.path().join("individual-repos").join("my-service");
        fs::create_dir_all(&target_dir).unwrap();
        fs::write(target_dir.join("bandit.json"), "{}").unwrap();
        fs::write(target_dir.join("prowler.ndjson"), "").unwrap();
        fs::write(target_dir.join("unknown-tool.json"), "{}").unwrap();
        fs::write(target_dir.join("notes.txt"), "hello").unwrap();

        let units = discover(dir.path(), &["bandit", "prowler"]);
        assert_eq!(units.len(), 2);
        assert!(units.iter().any(|u| u.adapter_name == "bandit"));
        assert!(units.iter().any(|u| u.adapter_name == "prowler"));
    }

    #[test]
    fn missing_individual_repos_dir_returns_empty() {
        let dir = tempdir().unwrap();
        assert!(discover(dir.path(), &["bandit"]).is_empty());
    }
}
