use crate::config::types::{Config, ConfigOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use docset_ripple::config::load_config;
///
/// let config = load_config(Path::new("resty.toml")).unwrap();
/// println!("Seed: {}", config.crawler.url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_overrides(path, &ConfigOverrides::default())
}

/// Loads a configuration file and applies command line overrides before
/// validating it
pub fn load_config_with_overrides(
    path: &Path,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, overrides)
}

/// Parses TOML content, applies overrides, normalizes and validates
pub fn parse_config(content: &str, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;

    config.apply_overrides(overrides);
    config.normalize();

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is logged at load time so two builds can be told apart.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration with overrides and returns both the config and
/// the hash of the file
pub fn load_config_with_hash(
    path: &Path,
    overrides: &ConfigOverrides,
) -> Result<(Config, String), ConfigError> {
    let config = load_config_with_overrides(path, overrides)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
