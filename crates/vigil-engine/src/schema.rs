use vigil_types::Finding;

/// Draft-07-compatible JSON Schema for the canonical Finding record (schema
/// version 1.2.0), compiled into the binary. Authored from the Finding field
/// table rather than generated, since the validation surface here is small
/// and fully enumerable ahead of time.
pub const FINDING_SCHEMA_JSON: &str = include_str!("finding_schema.json");

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingField(&'static str),
    WrongSchemaVersion(String),
    UnknownSeverity(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingField(field) => write!(f, "missing required field `{field}`"),
            ValidationError::WrongSchemaVersion(got) => {
                write!(f, "schemaVersion `{got}` does not match `{}`", vigil_types::SCHEMA_VERSION)
            }
            ValidationError::UnknownSeverity(got) => write!(f, "severity `{got}` is not a closed-set value"),
        }
    }
}

/// Structural check against the required fields and closed enums of §3.1/§3.2.
/// Returns the first failure per finding rather than attempting to collect
/// every error, matching the teacher's categorize-then-report pattern.
pub fn validate_finding(finding: &Finding) -> Result<(), ValidationError> {
    if finding.schema_version != vigil_types::SCHEMA_VERSION {
        return Err(ValidationError::WrongSchemaVersion(finding.schema_version.clone()));
    }
    if finding.id.is_empty() {
        return Err(ValidationError::MissingField("id"));
    }
    if finding.rule_id.is_empty() {
        return Err(ValidationError::MissingField("ruleId"));
    }
    if finding.tool.name.is_empty() {
        return Err(ValidationError::MissingField("tool.name"));
    }
    if finding.message.is_empty() {
        return Err(ValidationError::MissingField("message"));
    }
    let severity_str = finding.severity.as_str();
    if !["info", "low", "medium", "high", "critical"].contains(&severity_str) {
        return Err(ValidationError::UnknownSeverity(severity_str.to_string()));
    }
    Ok(())
}

/// Validates a list of findings, returning `true` only if every one passes.
pub fn validate_all(findings: &[Finding]) -> bool {
    findings.iter().all(|f| validate_finding(f).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_types::{FindingBuilder, Location, Severity};

    #[test]
    fn well_formed_finding_passes() {
        let f = FindingBuilder::new(
            "abc123",
            "B101",
            Severity::Low,
            "bandit",
            "1.7.0",
            Location::new("app.py", 10),
            "assert used",
        )
        .build();
        assert!(validate_finding(&f).is_ok());
    }

    #[test]
    fn wrong_schema_version_fails() {
        let mut f = FindingBuilder::new(
            "abc123",
            "B101",
            Severity::Low,
            "bandit",
            "1.7.0",
            Location::new("app.py", 10),
            "assert used",
        )
        .build();
        f.schema_version = "0.9.0".to_string();
        assert_eq!(
            validate_finding(&f),
            Err(ValidationError::WrongSchemaVersion("0.9.0".to_string()))
        );
    }

    #[test]
    fn validate_all_short_circuits_on_first_bad_finding() {
        let good = FindingBuilder::new(
            "a",
            "R1",
            Severity::High,
            "bandit",
            "1.7.0",
            Location::new("a.py", 1),
            "msg",
        )
        .build();
        let mut bad = good.clone();
        bad.id = String::new();
        assert!(!validate_all(&[good, bad]));
    }
}
