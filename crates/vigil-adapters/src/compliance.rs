use vigil_types::{Compliance, Finding};

/// Enrich a finding with framework control tags, derived purely from its
/// `tags` and any `risk.cwe` it already carries.
///
/// Pure and idempotent: running it twice produces the same `compliance`
/// map, and no other field is ever touched. When nothing matches, the
/// `compliance` field is left unset rather than populated with an empty map.
///
/// The mapping table below is a designed approximation (the adapter
/// collection this was ported from imports a more elaborate table that
/// wasn't available to reconstruct from); it keys on the domain tag every
/// adapter already attaches rather than on per-tool rule-id patterns, since
/// tags are the one field guaranteed present and normalized everywhere.
pub fn enrich_finding_with_compliance(mut finding: Finding) -> Finding {
    let mut compliance: Compliance = finding.compliance.clone().unwrap_or_default();

    for tag in &finding.tags {
        match tag.as_str() {
            "sast" => {
                push_unique(&mut compliance, "owasp-top-10", "A03:2021-Injection");
                push_unique(&mut compliance, "nist-800-53", "SI-10");
            }
            "secret" | "secrets" | "hardcoded-secret" => {
                push_unique(&mut compliance, "owasp-top-10", "A07:2021-Identification-and-Authentication-Failures");
                push_unique(&mut compliance, "pci-dss", "Req-3");
                push_unique(&mut compliance, "pci-dss", "Req-8");
                push_unique(&mut compliance, "nist-800-53", "IA-5");
            }
            "iac" | "infrastructure-as-code" => {
                push_unique(&mut compliance, "owasp-top-10", "A05:2021-Security-Misconfiguration");
                push_unique(&mut compliance, "pci-dss", "Req-1");
                push_unique(&mut compliance, "pci-dss", "Req-2");
            }
            "sca" | "dependency" | "cve" => {
                push_unique(&mut compliance, "owasp-top-10", "A06:2021-Vulnerable-and-Outdated-Components");
                push_unique(&mut compliance, "pci-dss", "Req-6");
            }
            "cloud-security" | "k8s-security" => {
                push_unique(&mut compliance, "pci-dss", "Req-1");
                push_unique(&mut compliance, "nist-800-53", "AC-6");
            }
            "system-hardening" => {
                push_unique(&mut compliance, "nist-800-53", "CM-6");
            }
            "cicd-security" => {
                push_unique(&mut compliance, "owasp-top-10", "A08:2021-Software-and-Data-Integrity-Failures");
            }
            "malware-detection" => {
                push_unique(&mut compliance, "nist-800-53", "SI-3");
            }
            _ => {}
        }
    }

    if let Some(risk) = &finding.risk {
        for cwe in &risk.cwe {
            push_unique(&mut compliance, "cwe", cwe);
        }
    }

    finding.compliance = if compliance.is_empty() { None } else { Some(compliance) };
    finding
}

fn push_unique(compliance: &mut Compliance, framework: &str, control: &str) {
    let entry = compliance.entry(framework.to_string()).or_default();
    if !entry.iter().any(|c| c == control) {
        entry.push(control.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_types::{FindingBuilder, Location, Severity};

    fn base_finding(tags: Vec<&str>) -> Finding {
        FindingBuilder::new(
            "id",
            "rule",
            Severity::High,
            "tool",
            "1.0",
            Location::new("path", 1),
            "message",
        )
        .tags(tags.into_iter().map(String::from).collect())
        .build()
    }

    #[test]
    fn sast_tag_maps_to_owasp_and_nist() {
        let f = enrich_finding_with_compliance(base_finding(vec!["sast"]));
        let compliance = f.compliance.unwrap();
        assert!(compliance.contains_key("owasp-top-10"));
        assert!(compliance.contains_key("nist-800-53"));
    }

    #[test]
    fn unmapped_tags_leave_compliance_unset() {
        let f = enrich_finding_with_compliance(base_finding(vec!["unrelated-tag"]));
        assert!(f.compliance.is_none());
    }

    #[test]
    fn idempotent_under_repeated_application() {
        let once = enrich_finding_with_compliance(base_finding(vec!["secret"]));
        let twice = enrich_finding_with_compliance(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn never_touches_other_fields() {
        let original = base_finding(vec!["sast"]);
        let enriched = enrich_finding_with_compliance(original.clone());
        assert_eq!(original.id, enriched.id);
        assert_eq!(original.severity, enriched.severity);
        assert_eq!(original.message, enriched.message);
    }
}
