//! Statistics generation from a docset index
//!
//! This module provides functionality for extracting and displaying
//! search index statistics from the storage layer.

use crate::storage::{IndexStore, StorageResult};

/// Search index statistics summary
#[derive(Debug, Clone, Default)]
pub struct IndexStatistics {
    /// Total number of rows in `searchIndex`
    pub total_entries: u64,

    /// Count of entries by Dash type, largest first
    pub entries_by_type: Vec<(String, u64)>,
}

impl IndexStatistics {
    /// Number of rows of the given entry type
    pub fn count_of(&self, entry_type: &str) -> u64 {
        self.entries_by_type
            .iter()
            .find(|(t, _)| t == entry_type)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }
}

/// Loads statistics from an index store
///
/// # Arguments
///
/// * `store` - The index to query
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(store: &dyn IndexStore) -> StorageResult<IndexStatistics> {
    let total_entries = store.count_entries()?;

    let mut entries_by_type = store.count_by_type()?;
    entries_by_type.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(IndexStatistics {
        total_entries,
        entries_by_type,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &IndexStatistics) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Total entries: {}", stats.total_entries);
    println!("  Entry types: {}", stats.entries_by_type.len());
    println!();

    if stats.entries_by_type.is_empty() {
        return;
    }

    println!("Entries by Type:");
    for (entry_type, count) in &stats.entries_by_type {
        let percentage = if stats.total_entries > 0 {
            (*count as f64 / stats.total_entries as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", entry_type, count, percentage);
    }
}
