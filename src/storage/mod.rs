//! Storage module for the docset search index
//!
//! Dash reads entries from a SQLite table named `searchIndex`. This module
//! creates that table, clears it for a fresh build and inserts entries with
//! duplicates ignored.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteIndexStore;
pub use traits::{IndexRecord, IndexStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the index of a docset for a fresh build
///
/// # Arguments
///
/// * `path` - Path to the `docSet.dsidx` file
///
/// # Returns
///
/// * `Ok(SqliteIndexStore)` - An empty index
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_index(path: &Path) -> StorageResult<SqliteIndexStore> {
    SqliteIndexStore::open(path)
}
