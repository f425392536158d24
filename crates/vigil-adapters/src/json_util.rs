use serde_json::Value;
use std::path::Path;
use vigil_core::ResourceLimits;

/// Read a tool-output file's contents, honoring the bounded-size limit.
///
/// Returns `None` for a missing file, an oversized file (logged at warning),
/// or any other IO failure the adapter should treat as "no output" — none of
/// these are adapter bugs, so callers should not propagate them.
pub fn read_bounded(path: &Path, limits: &ResourceLimits) -> Option<String> {
    let meta = std::fs::metadata(path).ok()?;
    if !meta.is_file() {
        return None;
    }
    if meta.len() > limits.max_file_bytes {
        tracing::warn!(path = %path.display(), size = meta.len(), "file exceeds max size, skipping");
        return None;
    }
    std::fs::read_to_string(path).ok()
}

/// Parse a whole-document JSON value, bounding nesting depth.
///
/// Returns `None` on malformed JSON or on exceeding `max_json_depth`; both
/// cases are logged at warning by the caller, not here, so the message can
/// name the adapter and file.
pub fn parse_json_bounded(raw: &str, limits: &ResourceLimits) -> Option<Value> {
    let value: Value = serde_json::from_str(raw).ok()?;
    if depth(&value) > limits.max_json_depth {
        return None;
    }
    Some(value)
}

fn depth(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        _ => 1,
    }
}

/// Parse an NDJSON stream, skipping malformed lines rather than aborting.
///
/// Each successfully parsed line is handed to `f`; malformed lines are
/// counted and logged once at debug level by the caller via the returned
/// skipped-line count.
pub fn for_each_ndjson_line(raw: &str, mut f: impl FnMut(Value)) -> usize {
    let mut skipped = 0;
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => f(value),
            Err(_) => skipped += 1,
        }
    }
    skipped
}

/// Look up the first present key among `keys` in a JSON object.
pub fn first_present<'a>(obj: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

/// Read a string field, trying alternate keys in order, defaulting to "".
pub fn str_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> String {
    first_present(obj, keys)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Tolerant line-number extraction: accepts a scalar int, a numeric string,
/// a `[start, end]` list (first element), or a `"10-15"` range string
/// (first number). Anything else defaults to 0, never panics.
pub fn tolerant_line_number(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as u32,
        Some(Value::String(s)) => first_integer_in(s).unwrap_or(0),
        Some(Value::Array(items)) => items
            .first()
            .and_then(|v| v.as_u64())
            .map(|n| n as u32)
            .unwrap_or(0),
        _ => 0,
    }
}

fn first_integer_in(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if !digits.is_empty() {
        return digits.parse().ok();
    }
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        if c.is_ascii_digit() {
            let rest: String = s[i..].chars().take_while(|c| c.is_ascii_digit()).collect();
            return rest.parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_reads_none() {
        let limits = ResourceLimits::default();
        assert!(read_bounded(Path::new("/nope/nope/nope.json"), &limits).is_none());
    }

    #[test]
    fn ndjson_skips_malformed_lines() {
        let raw = "{\"a\":1}\nnot json\n{\"a\":2}\n";
        let mut seen = Vec::new();
        let skipped = for_each_ndjson_line(raw, |v| seen.push(v));
        assert_eq!(seen.len(), 2);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn tolerant_line_number_variants() {
        assert_eq!(tolerant_line_number(Some(&json!(10))), 10);
        assert_eq!(tolerant_line_number(Some(&json!("10-15"))), 10);
        assert_eq!(tolerant_line_number(Some(&json!([12, 18]))), 12);
        assert_eq!(tolerant_line_number(Some(&json!("abc"))), 0);
        assert_eq!(tolerant_line_number(None), 0);
    }

    #[test]
    fn depth_limit_rejects_deep_nesting() {
        let mut value = json!(1);
        for _ in 0..10 {
            value = json!({ "nested": value });
        }
        let limits = ResourceLimits {
            max_json_depth: 3,
            ..ResourceLimits::default()
        };
        assert!(parse_json_bounded(&value.to_string(), &limits).is_none());
    }
}
