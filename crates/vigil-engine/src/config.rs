use vigil_core::ResourceLimits;

/// Settings for a single `gather_results` invocation, assembled from
/// environment variables. Missing or invalid values fall back to defaults
/// silently — never a hard error.
#[derive(Debug, Clone)]
pub struct Config {
    pub limits: ResourceLimits,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            limits: ResourceLimits::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: ResourceLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_default_limits() {
        let config = Config::default();
        assert_eq!(config.limits.max_file_bytes, ResourceLimits::default().max_file_bytes);
    }
}
