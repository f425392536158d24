use crate::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    #[serde(rename = "startLine")]
    pub start_line: u32,
    #[serde(rename = "endLine", skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
}

impl Location {
    pub fn new(path: impl Into<String>, start_line: u32) -> Self {
        Self {
            path: path.into(),
            start_line,
            end_line: None,
        }
    }
}

/// Either a plain-text remediation note or a structured fix description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Remediation {
    Text(String),
    Structured { fix: String, steps: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cvss {
    pub version: String,
    pub score: f64,
    pub vector: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub cwe: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub owasp: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

/// Framework name -> control identifiers, populated by the compliance enricher.
pub type Compliance = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    pub id: String,
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub severity: Severity,
    pub tool: Tool,
    pub location: Location,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub references: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss: Option<Cvss>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<Risk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<Compliance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl Finding {
    /// `title` defaults to `ruleId` when absent, per the schema's field note.
    pub fn title_or_rule_id(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.rule_id)
    }
}

/// Ergonomic constructor shared by every adapter; fixes `schemaVersion` and
/// fills required fields so adapters cannot accidentally diverge on either.
#[derive(Debug, Clone)]
pub struct FindingBuilder {
    inner: Finding,
}

impl FindingBuilder {
    pub fn new(
        id: impl Into<String>,
        rule_id: impl Into<String>,
        severity: Severity,
        tool_name: impl Into<String>,
        tool_version: impl Into<String>,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            inner: Finding {
                schema_version: crate::SCHEMA_VERSION.to_string(),
                id: id.into(),
                rule_id: rule_id.into(),
                severity,
                tool: Tool {
                    name: tool_name.into(),
                    version: tool_version.into(),
                },
                location,
                message: message.into(),
                title: None,
                description: None,
                remediation: None,
                references: Vec::new(),
                tags: Vec::new(),
                cvss: None,
                risk: None,
                compliance: None,
                context: None,
                raw: None,
            },
        }
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.inner.title = Some(v.into());
        self
    }

    pub fn description(mut self, v: impl Into<String>) -> Self {
        self.inner.description = Some(v.into());
        self
    }

    pub fn remediation(mut self, v: Remediation) -> Self {
        self.inner.remediation = Some(v);
        self
    }

    pub fn references(mut self, v: Vec<String>) -> Self {
        self.inner.references = v;
        self
    }

    pub fn tags(mut self, v: Vec<String>) -> Self {
        self.inner.tags = v;
        self
    }

    pub fn cvss(mut self, v: Cvss) -> Self {
        self.inner.cvss = Some(v);
        self
    }

    pub fn risk(mut self, v: Risk) -> Self {
        self.inner.risk = Some(v);
        self
    }

    pub fn context(mut self, v: serde_json::Value) -> Self {
        self.inner.context = Some(v);
        self
    }

    pub fn raw(mut self, v: serde_json::Value) -> Self {
        self.inner.raw = Some(v);
        self
    }

    pub fn build(self) -> Finding {
        self.inner
    }
}
