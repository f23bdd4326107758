//! SQLite storage implementation
//!
//! This module provides the `docSet.dsidx` implementation of [`IndexStore`].

use crate::docset::IndexEntry;
use crate::storage::schema::{initialize_schema, CLEAR_SQL};
use crate::storage::traits::{IndexRecord, IndexStore, StorageError, StorageResult};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

/// SQLite search index
pub struct SqliteIndexStore {
    conn: Connection,
}

impl SqliteIndexStore {
    /// Opens or creates the index at `path` and clears existing rows
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `docSet.dsidx` file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteIndexStore)` - An empty index ready for inserts
    /// * `Err(StorageError)` - Failed to open or initialize the database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;

        let mut store = Self { conn };
        store.reset()?;
        Ok(store)
    }

    /// Opens an existing index read-only, keeping its rows
    pub fn open_existing(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            return Err(StorageError::IndexNotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory index (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl IndexStore for SqliteIndexStore {
    fn reset(&mut self) -> StorageResult<()> {
        self.conn.execute(CLEAR_SQL, [])?;
        Ok(())
    }

    fn insert_entries(&mut self, entries: &[IndexEntry]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO searchIndex(name, type, path) VALUES (?1, ?2, ?3)",
            )?;
            for entry in entries {
                let href = entry.href();
                inserted += stmt.execute(params![entry.name, entry.entry_type, href])?;
                tracing::trace!("Indexed {}", entry);
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn count_entries(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM searchIndex", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_type(&self) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT type, COUNT(*) FROM searchIndex GROUP BY type ORDER BY type",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn entries(&self) -> StorageResult<Vec<IndexRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, type, path FROM searchIndex ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(IndexRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                entry_type: row.get(2)?,
                path: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
