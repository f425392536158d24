use sha2::{Digest, Sha256};

/// Deterministic finding identity.
///
/// `SHA-256(tool|ruleId|path|startLine|message[:120])`, first 16 hex
/// characters, lowercase. No locale/unicode normalization beyond the
/// source string — byte-for-byte equal inputs always produce the same id.
pub fn fingerprint(tool: &str, rule_id: &str, path: &str, start_line: u32, message: &str) -> String {
    let truncated_message: String = message.chars().take(120).collect();
    let input = format!("{tool}|{rule_id}|{path}|{start_line}|{truncated_message}");
    let digest = Sha256::digest(input.as_bytes());
    let hex = format!("{:x}", digest);
    hex[..16].to_string()
}
