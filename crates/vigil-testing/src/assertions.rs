//! Custom assertions for validating normalized findings.
//!
//! Provides high-level assertions that make adapter and pipeline tests more
//! readable: schema validity, fingerprint stability, and compliance-field
//! idempotence.

use anyhow::{Context, Result};
use vigil_adapters::fingerprint;
use vigil_types::Finding;

/// Assert that `finding` passes structural schema validation.
pub fn assert_schema_valid(finding: &Finding) -> Result<()> {
    vigil_engine::validate_finding(finding)
        .map_err(|e| anyhow::anyhow!("finding {} failed schema validation: {e}", finding.id))
}

/// Assert that every finding in `findings` passes schema validation.
pub fn assert_all_schema_valid(findings: &[Finding]) -> Result<()> {
    for finding in findings {
        assert_schema_valid(finding)?;
    }
    Ok(())
}

/// Assert that `finding.id` matches the deterministic fingerprint of its own
/// identity fields — catches adapters that mint ids some other way.
pub fn assert_id_is_fingerprint(finding: &Finding) -> Result<()> {
    let expected = fingerprint(
        &finding.tool.name,
        &finding.rule_id,
        &finding.location.path,
        finding.location.start_line,
        &finding.message,
    );
    if finding.id != expected {
        anyhow::bail!(
            "finding id {} does not match expected fingerprint {}",
            finding.id,
            expected
        );
    }
    Ok(())
}

/// Assert that `findings` contains no two entries sharing the same id.
pub fn assert_ids_unique(findings: &[Finding]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for finding in findings {
        if !seen.insert(finding.id.as_str()) {
            anyhow::bail!("duplicate finding id: {}", finding.id);
        }
    }
    Ok(())
}

/// Assert that `findings` contains at least one entry whose `tool.name`
/// equals `expected`.
pub fn assert_contains_tool(findings: &[Finding], expected: &str) -> Result<()> {
    findings
        .iter()
        .find(|f| f.tool.name == expected)
        .map(|_| ())
        .with_context(|| format!("expected at least one finding from tool {expected}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_types::{FindingBuilder, Location, Severity};

    fn sample() -> Finding {
        FindingBuilder::new(
            fingerprint("bandit", "B101", "app.py", 10, "assert used"),
            "B101",
            Severity::Low,
            "bandit",
            "1.7.0",
            Location::new("app.py", 10),
            "assert used",
        )
        .build()
    }

    #[test]
    fn schema_valid_sample_passes() {
        assert!(assert_schema_valid(&sample()).is_ok());
    }

    #[test]
    fn id_matches_fingerprint() {
        assert!(assert_id_is_fingerprint(&sample()).is_ok());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let findings = vec![sample(), sample()];
        assert!(assert_ids_unique(&findings).is_err());
    }

    #[test]
    fn contains_tool_finds_match() {
        let findings = vec![sample()];
        assert!(assert_contains_tool(&findings, "bandit").is_ok());
        assert!(assert_contains_tool(&findings, "semgrep").is_err());
    }
}
