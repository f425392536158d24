use vigil_sdk::{default_registry, gather_results, validate};
use vigil_testing::ResultsTree;

#[test]
fn gathers_and_enriches_across_two_targets() {
    let tree = ResultsTree::new().unwrap();
    tree.write_json(
        "svc-a",
        "bandit",
        r#"{"results":[{"test_id":"B105","issue_severity":"HIGH","filename":"app.py","line_number":12,"issue_text":"hardcoded password"}]}"#,
    )
    .unwrap();
    tree.write_json(
        "svc-a",
        "syft",
        r#"{"artifacts":[{"name":"requests","version":"2.31.0","type":"python","purl":"pkg:pypi/requests@2.31.0"}]}"#,
    )
    .unwrap();
    tree.write_json(
        "svc-b",
        "semgrep",
        r#"{"results":[{"check_id":"python.lang.security.dangerous-exec","extra":{"severity":"ERROR","message":"exec used","lines":"exec(x)"},"path":"main.py","start":{"line":5}}]}"#,
    )
    .unwrap();

    let registry = default_registry();
    let findings = gather_results(tree.root(), &registry).unwrap();

    assert!(findings.iter().any(|f| f.tool.name == "bandit"));
    assert!(findings.iter().any(|f| f.tool.name == "syft"));
    assert!(findings.iter().any(|f| f.tool.name == "semgrep"));

    for finding in &findings {
        assert!(validate(finding).is_ok());
    }
}

#[test]
fn malformed_sibling_does_not_drop_good_findings() {
    let tree = ResultsTree::new().unwrap();
    tree.write_json(
        "svc-a",
        "bandit",
        r#"{"results":[{"test_id":"B101","issue_severity":"MEDIUM","filename":"app.py","line_number":1,"issue_text":"assert used"}]}"#,
    )
    .unwrap();
    tree.write_json("svc-a", "semgrep", "{ not valid json").unwrap();

    let registry = default_registry();
    let findings = gather_results(tree.root(), &registry).unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].tool.name, "bandit");
}

#[test]
fn nonexistent_root_is_rejected() {
    let registry = default_registry();
    let result = gather_results(std::path::Path::new("/nonexistent/vigil-sdk-e2e"), &registry);
    assert!(result.is_err());
}
