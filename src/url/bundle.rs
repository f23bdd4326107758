use crate::config::BundleNameConfig;
use crate::{ConfigError, ConfigResult};
use regex::Regex;

/// Derives the logical bundle an URL path belongs to
///
/// Bundle names show up as the menu description of every index entry, so a
/// Go module path like `/github.com/go-resty/resty/v2` can be shown as `v2`
/// (or anything else the replacement template produces).
#[derive(Debug, Clone)]
pub struct BundleNamer {
    pattern: Option<Regex>,
    replace: Option<String>,
    default_name: String,
}

impl BundleNamer {
    /// Compiles the configured pattern
    ///
    /// # Arguments
    ///
    /// * `config` - The `[bundle-name]` section of the configuration
    /// * `default_name` - Name used whenever the pattern does not apply
    ///
    /// # Returns
    ///
    /// * `Ok(BundleNamer)` - Ready to name paths
    /// * `Err(ConfigError::InvalidPattern)` - If the pattern does not compile
    pub fn new(config: &BundleNameConfig, default_name: impl Into<String>) -> ConfigResult<Self> {
        let pattern = match config.pattern.as_deref().filter(|p| !p.is_empty()) {
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                ConfigError::InvalidPattern(format!("bundle-name.pattern '{}': {}", pattern, e))
            })?),
            None => None,
        };

        Ok(Self {
            pattern,
            replace: config.replace.clone().filter(|r| !r.is_empty()),
            default_name: default_name.into(),
        })
    }

    /// Names the bundle of a URL path
    ///
    /// Falls back to the default name when the path is empty, when no
    /// replacement template or pattern is configured, or when the pattern
    /// does not match the path.
    pub fn bundle_name(&self, path: &str) -> String {
        if path.is_empty() {
            return self.default_name.clone();
        }
        let (Some(pattern), Some(replace)) = (&self.pattern, &self.replace) else {
            return self.default_name.clone();
        };
        if !pattern.is_match(path) {
            return self.default_name.clone();
        }
        pattern.replace_all(path, replace.as_str()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namer(pattern: Option<&str>, replace: Option<&str>) -> BundleNamer {
        let config = BundleNameConfig {
            pattern: pattern.map(String::from),
            replace: replace.map(String::from),
        };
        BundleNamer::new(&config, "resty").unwrap()
    }

    #[test]
    fn test_empty_path_uses_default() {
        let n = namer(Some("^/(.*)$"), Some("$1"));
        assert_eq!(n.bundle_name(""), "resty");
    }

    #[test]
    fn test_missing_replace_uses_default() {
        let n = namer(Some("^/(.*)$"), None);
        assert_eq!(n.bundle_name("/github.com/go-resty/resty/v2"), "resty");
    }

    #[test]
    fn test_missing_pattern_uses_default() {
        let n = namer(None, Some("$1"));
        assert_eq!(n.bundle_name("/github.com/go-resty/resty/v2"), "resty");
    }

    #[test]
    fn test_no_match_uses_default() {
        let n = namer(Some("^/gitlab.com/(.*)$"), Some("$1"));
        assert_eq!(n.bundle_name("/github.com/go-resty/resty/v2"), "resty");
    }

    #[test]
    fn test_match_applies_template() {
        let n = namer(Some("^/github.com/go-resty/(.*)$"), Some("$1"));
        assert_eq!(n.bundle_name("/github.com/go-resty/resty/v2"), "resty/v2");
    }

    #[test]
    fn test_named_group_template() {
        let n = namer(Some(r"^/docs/(?P<pkg>[^/]+)/.*$"), Some("lib-${pkg}"));
        assert_eq!(n.bundle_name("/docs/net/http"), "lib-net");
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let n = namer(Some(""), Some(""));
        assert_eq!(n.bundle_name("/docs/pkg"), "resty");
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let config = BundleNameConfig {
            pattern: Some("([".to_string()),
            replace: Some("$1".to_string()),
        };
        let result = BundleNamer::new(&config, "resty");
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }
}
