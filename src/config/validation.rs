use crate::config::types::{
    BundleNameConfig, Config, CrawlerConfig, DocsetConfig, HttpConfig, IndexNameKind, IndexRule,
    PageConfig, PlistConfig,
};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_docset_config(&config.docset)?;
    validate_crawler_config(&config.crawler)?;
    validate_bundle_name_config(&config.bundle_name)?;
    validate_plist_config(&config.plist)?;
    validate_http_config(&config.http)?;
    validate_page_config(&config.page)?;
    validate_index_rules(&config.index)?;
    Ok(())
}

fn validate_docset_config(config: &DocsetConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "docset.name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the seed URL and the sub-path regex
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            config.url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            config.url
        )));
    }

    if let Some(regex) = &config.sub_path_regex {
        validate_regex("crawler.sub-path-regex", regex)?;
    }

    Ok(())
}

fn validate_bundle_name_config(config: &BundleNameConfig) -> Result<(), ConfigError> {
    if let Some(pattern) = &config.pattern {
        validate_regex("bundle-name.pattern", pattern)?;
    }
    Ok(())
}

fn validate_plist_config(config: &PlistConfig) -> Result<(), ConfigError> {
    if config.cfbundle_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "plist.cfbundle-name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "http.timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "http.connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_page_config(config: &PageConfig) -> Result<(), ConfigError> {
    for selector in &config.remove_node_selector {
        validate_selector(selector)?;
    }

    for set_attr in &config.set_attrs {
        validate_selector(&set_attr.selector)?;
        if set_attr.attr.key.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "page.set-attrs for '{}' has an empty attribute key",
                set_attr.selector
            )));
        }
    }

    Ok(())
}

/// Validates index rules: selectors compile and name strategies are complete
fn validate_index_rules(rules: &[IndexRule]) -> Result<(), ConfigError> {
    for rule in rules {
        validate_selector(&rule.selector)?;

        if rule.entry_type.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "index rule '{}' has an empty type",
                rule.selector
            )));
        }

        let needs_value = matches!(rule.name.kind, IndexNameKind::Attr | IndexNameKind::Constant);
        if needs_value && rule.name.value.is_empty() {
            return Err(ConfigError::Validation(format!(
                "index rule '{}' needs a name value for {:?} names",
                rule.selector, rule.name.kind
            )));
        }
    }

    Ok(())
}

/// Compiles a CSS selector, mapping failures to a config error
pub(crate) fn validate_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

fn validate_regex(field: &str, pattern: &str) -> Result<(), ConfigError> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern(format!("{} '{}': {}", field, pattern, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{AttrValue, IndexName, SetAttr};

    fn valid_config() -> Config {
        toml::from_str(
            r#"
[docset]
name = "resty"

[crawler]
url = "https://pkg.go.dev/github.com/go-resty/resty/v2"

[plist]
cfbundle-identifier = "godoc"
cfbundle-name = "resty"
docset-platform-family = "godoc"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_seed_must_be_web_url() {
        let mut config = valid_config();
        config.crawler.url = "ftp://example.com/docs".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.crawler.url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut config = valid_config();
        config.docset.name = "  ".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_empty_cfbundle_name_rejected() {
        let mut config = valid_config();
        config.plist.cfbundle_name = String::new();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_regexes_rejected() {
        let mut config = valid_config();
        config.crawler.sub_path_regex = Some("([".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidPattern(_))));

        let mut config = valid_config();
        config.bundle_name.pattern = Some("(?P<".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn test_invalid_selectors_rejected() {
        let mut config = valid_config();
        config.page.remove_node_selector = vec!["header".to_string(), "[[".to_string()];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector { .. })
        ));

        let mut config = valid_config();
        config.page.set_attrs = vec![SetAttr {
            selector: "details".to_string(),
            attr: AttrValue {
                key: String::new(),
                value: String::new(),
            },
        }];
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_index_name_value_required() {
        let mut config = valid_config();
        config.index = vec![IndexRule {
            selector: "h4".to_string(),
            entry_type: "Function".to_string(),
            name: IndexName {
                kind: IndexNameKind::Attr,
                value: String::new(),
            },
            level: 1,
            anchor_only: false,
        }];
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.index[0].name.value = "id".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.http.timeout_secs = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector("h4.Documentation-functionHeader").is_ok());
        assert!(validate_selector("div > a[href]").is_ok());
        assert!(validate_selector("").is_err());
    }
}
