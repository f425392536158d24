use tempfile::TempDir;
use vigil_core::{expand_tilde, resolve_results_root};

#[test]
fn expand_tilde_expands_home_prefix() {
    if let Some(home) = dirs::home_dir() {
        assert_eq!(expand_tilde("~/results"), home.join("results"));
    }
}

#[test]
fn expand_tilde_leaves_non_tilde_paths_untouched() {
    assert_eq!(expand_tilde("/var/log/scan"), std::path::PathBuf::from("/var/log/scan"));
}

#[test]
fn resolve_results_root_prefers_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let explicit = temp_dir.path().to_string_lossy().to_string();
    let resolved = resolve_results_root(Some(&explicit)).unwrap();
    assert_eq!(resolved, temp_dir.path());
}

#[test]
fn resolve_results_root_falls_back_to_cwd() {
    let resolved = resolve_results_root(None).unwrap();
    assert_eq!(resolved, std::env::current_dir().unwrap());
}
