//! Build event sink
//!
//! The crawler reports each written page and each saved or missing resource
//! to an injected observer, so callers can show progress or collect events
//! without the crawler knowing how.

use std::sync::Arc;
use url::Url;

/// Receives build events as they happen
///
/// Every method has an empty default, implementors override what they need.
pub trait CrawlObserver: Send + Sync {
    /// A page was rewritten and written below the Documents root
    fn page_written(&self, _url: &Url, _local_path: &str, _entries: usize) {}

    /// A resource was fetched; `written` is false when a file already existed
    fn resource_saved(&self, _url: &Url, _local_path: &str, _written: bool) {}

    /// A resource answered 404 and the referring element was removed
    fn resource_missing(&self, _url: &Url, _page: &Url) {}
}

/// Shared observer handle held by the crawler
pub type SharedObserver = Arc<dyn CrawlObserver>;

/// Default observer logging every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn page_written(&self, url: &Url, local_path: &str, entries: usize) {
        tracing::info!("Wrote {} ({} entries) from {}", local_path, entries, url);
    }

    fn resource_saved(&self, url: &Url, local_path: &str, written: bool) {
        if written {
            tracing::debug!("Saved {} from {}", local_path, url);
        } else {
            tracing::debug!("Kept existing {} for {}", local_path, url);
        }
    }

    fn resource_missing(&self, url: &Url, page: &Url) {
        tracing::warn!("Removed reference to missing {} on {}", url, page);
    }
}
