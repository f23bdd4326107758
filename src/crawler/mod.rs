//! Crawler module for building a docset from a live site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of pages and resources
//! - The breadth-first work queue and visited map
//! - Reference localization and page rewriting
//! - Build event reporting

mod coordinator;
mod fetcher;
mod observer;
mod scheduler;

pub use coordinator::{BuildReport, Crawler};
pub use fetcher::{build_http_client, fetch_url, FetchResponse};
pub use observer::{CrawlObserver, SharedObserver, TracingObserver};
pub use scheduler::{FetchTarget, Role, Scheduler, Visit};

use crate::config::Config;
use crate::docset::{write_info_plist, DocTree};
use crate::storage::{open_index, IndexStore};
use crate::Result;
use std::sync::Arc;

/// Builds a complete docset
///
/// This is the main entry point for a build. It will:
/// 1. Remove previously saved documents and create the directory layout
/// 2. Open the search index and clear its rows
/// 3. Crawl from the seed, writing pages and resources
/// 4. Write `Info.plist` pointing at the seed page
/// 5. Insert all collected entries into the index
///
/// # Arguments
///
/// * `config` - The normalized configuration
///
/// # Returns
///
/// * `Ok(BuildReport)` - Build completed
/// * `Err(DocsetError)` - Build failed; the bundle may be partial
pub async fn build_docset(config: &Config) -> Result<BuildReport> {
    build_docset_with_observer(config, Arc::new(TracingObserver)).await
}

/// Builds a complete docset, reporting events to `observer`
pub async fn build_docset_with_observer(
    config: &Config,
    observer: SharedObserver,
) -> Result<BuildReport> {
    let tree = DocTree::new(&config.docset.path, &config.docset.name);
    tree.rm()?;
    tree.mkdir()?;
    tracing::info!("Building {}", tree.bundle().display());

    let mut index = open_index(tree.db())?;

    let crawler = Crawler::new(config, tree.clone())?.with_observer(observer);
    let mut report = crawler.run().await?;

    write_info_plist(tree.info_plist(), &config.plist, &report.index_file_path)?;

    report.entries_indexed = index.insert_entries(&report.entries)?;
    tracing::info!(
        "Indexed {} of {} entries",
        report.entries_indexed,
        report.entries.len()
    );

    Ok(report)
}
