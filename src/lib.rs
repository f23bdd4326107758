//! Docset-Ripple: an offline docset builder
//!
//! This crate crawls a live HTML documentation site starting from a seed page,
//! localizes every page and resource it reaches within the configured scope,
//! inserts Dash anchors for selected elements and writes the rewritten pages
//! together with a SQLite search index into a `.docset` bundle.

pub mod config;
pub mod crawler;
pub mod docset;
pub mod dom;
pub mod output;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for docset builds
#[derive(Debug, Error)]
pub enum DocsetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("{url} not found")]
    NotFound { url: String },

    #[error("{url} status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid seed URL {url}: {source}")]
    InvalidSeed {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Invalid reference {reference:?} on {page}: {source}")]
    InvalidReference {
        page: String,
        reference: String,
        source: ::url::ParseError,
    },

    #[error("Local path {local_path:?} leaves the Documents root")]
    UnsafePath { local_path: String },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

impl DocsetError {
    /// Wraps an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the build stopped because a page answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for docset operations
pub type Result<T> = std::result::Result<T, DocsetError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{build_docset, BuildReport, Crawler};
pub use docset::{DocTree, IndexEntry};
