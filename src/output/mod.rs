//! Output module for build summaries and index statistics
//!
//! This module handles:
//! - Summarizing a finished build for the terminal
//! - Reading statistics back from an existing search index

pub mod stats;

pub use stats::{load_statistics, print_statistics, IndexStatistics};

use crate::crawler::BuildReport;
use chrono::{DateTime, Utc};

/// Summary of one finished build
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub pages: usize,
    pub resources_saved: usize,
    pub resources_existing: usize,
    pub resources_missing: usize,
    pub entries_found: usize,
    pub entries_indexed: usize,
    pub index_file_path: String,
}

impl BuildSummary {
    /// Generates a summary from a build report and its timing
    pub fn new(report: &BuildReport, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        let duration_seconds = (finished_at - started_at).num_seconds().max(0) as u64;

        Self {
            started_at,
            finished_at,
            duration_seconds,
            pages: report.pages,
            resources_saved: report.resources_saved,
            resources_existing: report.resources_existing,
            resources_missing: report.resources_missing,
            entries_found: report.entries.len(),
            entries_indexed: report.entries_indexed,
            index_file_path: report.index_file_path.clone(),
        }
    }

    /// Entries dropped by the index as duplicates
    pub fn duplicate_entries(&self) -> usize {
        self.entries_found.saturating_sub(self.entries_indexed)
    }
}

/// Prints a build summary to stdout
pub fn print_build_summary(summary: &BuildSummary) {
    println!("=== Build Summary ===\n");

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Duration: {}s", summary.duration_seconds);
    println!("  Index page: {}", summary.index_file_path);
    println!();

    println!("Documents:");
    println!("  Pages written: {}", summary.pages);
    println!("  Resources saved: {}", summary.resources_saved);
    println!("  Resources already present: {}", summary.resources_existing);
    println!("  Missing resources removed: {}", summary.resources_missing);
    println!();

    println!("Index:");
    println!("  Entries found: {}", summary.entries_found);
    println!("  Entries indexed: {}", summary.entries_indexed);
    if summary.duplicate_entries() > 0 {
        println!("  Duplicates ignored: {}", summary.duplicate_entries());
    }
}
