use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed severity scale every finding is normalized onto.
///
/// Ordered from least to most urgent so `Severity::Medium < Severity::Critical`
/// reads naturally; adapters should not add new variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Normalize an arbitrary tool-reported severity token.
    ///
    /// Never fails: unrecognized input defaults to `Medium`. Matching is
    /// ASCII case-insensitive only, no locale folding.
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            "INFO" | "INFORMATIONAL" => Severity::Info,
            "ERROR" => Severity::High,
            "WARNING" | "WARN" => Severity::Medium,
            "EMERGENCY" | "ALERT" => Severity::Critical,
            "NOTICE" => Severity::Low,
            "DEBUG" => Severity::Info,
            _ => Severity::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }

    /// Bucket a CVSS base score (0.0-10.0) into a severity.
    pub fn from_cvss_score(score: f64) -> Self {
        if score >= 9.0 {
            Severity::Critical
        } else if score >= 7.0 {
            Severity::High
        } else if score >= 4.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_explicit_tokens_case_insensitively() {
        assert_eq!(Severity::normalize("critical"), Severity::Critical);
        assert_eq!(Severity::normalize("High"), Severity::High);
        assert_eq!(Severity::normalize("MEDIUM"), Severity::Medium);
        assert_eq!(Severity::normalize("low"), Severity::Low);
        assert_eq!(Severity::normalize("Info"), Severity::Info);
    }

    #[test]
    fn maps_tool_vocabulary() {
        assert_eq!(Severity::normalize("error"), Severity::High);
        assert_eq!(Severity::normalize("warning"), Severity::Medium);
        assert_eq!(Severity::normalize("emergency"), Severity::Critical);
        assert_eq!(Severity::normalize("notice"), Severity::Low);
        assert_eq!(Severity::normalize("debug"), Severity::Info);
    }

    #[test]
    fn unknown_token_defaults_medium_and_never_panics() {
        assert_eq!(Severity::normalize("banana"), Severity::Medium);
        assert_eq!(Severity::normalize(""), Severity::Medium);
        assert_eq!(Severity::normalize("   "), Severity::Medium);
    }

    #[test]
    fn cvss_bucketing_matches_thresholds() {
        assert_eq!(Severity::from_cvss_score(9.8), Severity::Critical);
        assert_eq!(Severity::from_cvss_score(7.5), Severity::High);
        assert_eq!(Severity::from_cvss_score(4.0), Severity::Medium);
        assert_eq!(Severity::from_cvss_score(1.2), Severity::Low);
    }

    #[test]
    fn ordering_reflects_urgency() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Info);
    }
}
