//! Storage traits and error types
//!
//! This module defines the trait interface for search index backends and
//! associated error types.

use crate::docset::IndexEntry;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Index not found: {}", .0.display())]
    IndexNotFound(PathBuf),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One row of the search index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub id: i64,
    pub name: String,
    pub entry_type: String,
    pub path: String,
}

/// Trait for search index backends
pub trait IndexStore {
    /// Removes all rows
    fn reset(&mut self) -> StorageResult<()>;

    /// Inserts entries, silently ignoring exact `(name, type, path)` duplicates
    ///
    /// # Returns
    ///
    /// The number of rows actually added
    fn insert_entries(&mut self, entries: &[IndexEntry]) -> StorageResult<usize>;

    /// Counts all rows
    fn count_entries(&self) -> StorageResult<u64>;

    /// Counts rows per entry type, sorted by type
    fn count_by_type(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Returns every row ordered by id
    fn entries(&self) -> StorageResult<Vec<IndexRecord>>;
}
