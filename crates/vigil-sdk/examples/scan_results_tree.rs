//! Walk a results tree produced by a CI job and print every finding at
//! medium severity or above.
//!
//! Usage:
//!   cargo run --package vigil-sdk --example scan_results_tree -- /path/to/scan-results

use std::env;
use std::path::PathBuf;
use vigil_sdk::{default_registry, gather_results, Severity};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./scan-results"));

    let registry = default_registry();
    let findings = gather_results(&root, &registry)?;

    let mut relevant: Vec<_> = findings
        .into_iter()
        .filter(|f| f.severity >= Severity::Medium)
        .collect();
    relevant.sort_by(|a, b| b.severity.cmp(&a.severity));

    println!("{} findings at medium severity or above:", relevant.len());
    for finding in &relevant {
        println!(
            "[{}] {} {}:{} — {}",
            finding.severity.as_str(),
            finding.tool.name,
            finding.location.path,
            finding.location.start_line,
            finding.message
        );
    }

    Ok(())
}
