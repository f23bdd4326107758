//! Configuration module for docset builds
//!
//! This module handles loading, overriding, normalizing and validating TOML
//! configuration files.
//!
//! # Example
//!
//! ```no_run
//! use docset_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("resty.toml")).unwrap();
//! println!("Building {} to depth {}", config.docset.name, config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AttrValue, BundleNameConfig, Config, ConfigOverrides, CrawlerConfig, DocsetConfig, HttpConfig,
    IndexName, IndexNameKind, IndexRule, PageConfig, PlistConfig, SetAttr,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_config_with_overrides,
    parse_config,
};

pub(crate) use validation::validate_selector;
