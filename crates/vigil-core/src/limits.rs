/// Resource bounds applied while parsing adapter input, read from the
/// environment with silent fallback to defaults on missing/invalid values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLimits {
    pub max_file_bytes: u64,
    pub max_json_depth: usize,
    pub worker_count: usize,
}

const DEFAULT_MAX_FILE_BYTES: u64 = 512 * 1024 * 1024;
const DEFAULT_MAX_JSON_DEPTH: usize = 256;

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_json_depth: DEFAULT_MAX_JSON_DEPTH,
            worker_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl ResourceLimits {
    /// Read limits from `JMO_SCAN_MAX_FILE_BYTES`, `JMO_SCAN_MAX_JSON_DEPTH`,
    /// and `JMO_SCAN_WORKERS`. Any variable that is unset, empty, or does not
    /// parse as a positive integer falls back to the default silently.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_file_bytes: read_env_u64("JMO_SCAN_MAX_FILE_BYTES", defaults.max_file_bytes),
            max_json_depth: read_env_usize("JMO_SCAN_MAX_JSON_DEPTH", defaults.max_json_depth),
            worker_count: read_env_usize("JMO_SCAN_WORKERS", defaults.worker_count),
        }
    }
}

fn read_env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn read_env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let limits = ResourceLimits::default();
        assert_eq!(limits.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert_eq!(limits.max_json_depth, DEFAULT_MAX_JSON_DEPTH);
        assert!(limits.worker_count >= 1);
    }

    #[test]
    fn invalid_env_values_fall_back() {
        assert_eq!(read_env_u64("JMO_SCAN_MAX_FILE_BYTES_NOPE", 42), 42);
        assert_eq!(read_env_usize("JMO_SCAN_WORKERS_NOPE", 7), 7);
    }
}
