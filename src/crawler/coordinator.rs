//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop that:
//! - Fetches the seed and every reference it localizes exactly once
//! - Rewrites `href`/`src` attributes to paths inside the docset
//! - Removes elements whose resource answered 404
//! - Mines index entries and writes every page below the Documents root

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url};
use crate::crawler::observer::{SharedObserver, TracingObserver};
use crate::crawler::scheduler::{FetchTarget, Role, Scheduler, Visit};
use crate::docset::{DocTree, IndexEntry};
use crate::dom::{Document, DomTransformer, IndexExtractor};
use crate::url::{
    classify_link, relative_prefix, resolve_reference, rewritten_url, BundleNamer, LinkScope,
    HTML_SUFFIX,
};
use crate::{DocsetError, Result};
use ego_tree::NodeId;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Attributes holding references that get localized
const REFERENCE_ATTRS: [&str; 2] = ["href", "src"];

/// Result of one crawl
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Pages parsed, rewritten and written
    pub pages: usize,
    /// Resources written to disk
    pub resources_saved: usize,
    /// Resources skipped because a file already existed
    pub resources_existing: usize,
    /// Resources that answered 404 and were removed from their page
    pub resources_missing: usize,
    /// Local path of the seed page, the docset entry point
    pub index_file_path: String,
    /// Entries of all pages, in crawl order
    pub entries: Vec<IndexEntry>,
    /// Entries actually inserted, duplicates excluded
    pub entries_indexed: usize,
}

/// What happens to a reference attribute
enum Rewrite {
    Set(String),
    Remove,
}

/// Main crawler structure
pub struct Crawler {
    seed: Url,
    client: Client,
    tree: DocTree,
    scheduler: Scheduler,
    transformer: DomTransformer,
    extractor: IndexExtractor,
    bundles: BundleNamer,
    observer: SharedObserver,
    report: BuildReport,
}

impl Crawler {
    /// Creates a crawler writing into `tree`
    ///
    /// # Arguments
    ///
    /// * `config` - The normalized configuration
    /// * `tree` - Layout of the docset being built
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(DocsetError)` - Invalid seed, rule or HTTP client setup
    pub fn new(config: &Config, tree: DocTree) -> Result<Self> {
        let seed = Url::parse(&config.crawler.url).map_err(|source| DocsetError::InvalidSeed {
            url: config.crawler.url.clone(),
            source,
        })?;

        Ok(Self {
            seed,
            client: build_http_client(&config.http)?,
            tree,
            scheduler: Scheduler::new(&config.crawler)?,
            transformer: DomTransformer::new(&config.page)?,
            extractor: IndexExtractor::new(&config.index)?,
            bundles: BundleNamer::new(&config.bundle_name, config.plist.cfbundle_name.as_str())?,
            observer: Arc::new(TracingObserver),
            report: BuildReport::default(),
        })
    }

    /// Replaces the default tracing observer
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Runs the crawl to completion
    ///
    /// The seed is fetched first; its local path becomes the docset index
    /// file path. Targets are then processed breadth-first until the queue
    /// is empty. The first unrecoverable error aborts the crawl.
    pub async fn run(mut self) -> Result<BuildReport> {
        tracing::info!("Starting crawl at {}", self.seed);

        let response = fetch_url(&self.client, &self.seed).await?;
        let seed = FetchTarget::new(response, 0, Role::Page);
        self.report.index_file_path = seed.local_path();
        self.scheduler.mark(&seed.url, Visit::Saved { suffix: seed.suffix });
        self.scheduler.push(seed);

        while let Some(target) = self.scheduler.pop() {
            tracing::debug!("Processing {}", target);
            self.process(target).await?;
        }

        tracing::info!(
            "Crawl finished: {} pages, {} resources, {} entries, {} distinct URLs",
            self.report.pages,
            self.report.resources_saved + self.report.resources_existing,
            self.report.entries.len(),
            self.scheduler.visited_count()
        );
        Ok(self.report)
    }

    async fn process(&mut self, target: FetchTarget) -> Result<()> {
        let response = &target.response;
        if response.is_not_found() {
            return Err(DocsetError::NotFound {
                url: target.url.to_string(),
            });
        }
        if !response.is_ok() {
            return Err(DocsetError::Status {
                url: target.url.to_string(),
                status: response.status,
            });
        }

        match target.role {
            Role::Resource => self.save_resource(&target),
            Role::Page => self.process_page(&target).await,
        }
    }

    fn save_resource(&mut self, target: &FetchTarget) -> Result<()> {
        let local_path = target.local_path();
        let written = self.tree.save_file(&local_path, &target.response.body)?;
        if written {
            self.report.resources_saved += 1;
        } else {
            self.report.resources_existing += 1;
        }
        self.observer.resource_saved(&target.url, &local_path, written);
        Ok(())
    }

    async fn process_page(&mut self, page: &FetchTarget) -> Result<()> {
        let mut doc = Document::parse(&page.response.text());

        self.transformer.prepare(&mut doc);
        self.localize_references(&mut doc, page).await?;

        let local_path = page.local_path();
        let bundle = self.bundles.bundle_name(page.url.path());
        let extracted = self.extractor.extract(&mut doc, &bundle, &local_path);

        self.transformer
            .insert_online_comment(&mut doc, page.url.as_str());
        self.transformer.insert_anchor_links(&mut doc);

        self.tree.write_document(&local_path, &doc.html())?;

        let entry_count = extracted.len() + 1;
        self.report
            .entries
            .push(IndexEntry::package(&bundle, &local_path));
        self.report.entries.extend(extracted);
        self.report.pages += 1;
        self.observer
            .page_written(&page.url, &local_path, entry_count);
        Ok(())
    }

    /// Rewrites every `href`/`src` of the page, fetching what it reaches
    async fn localize_references(&mut self, doc: &mut Document, page: &FetchTarget) -> Result<()> {
        let prefix = relative_prefix(&page.local_path());

        let mut ids: Vec<NodeId> = Vec::new();
        for attr in REFERENCE_ATTRS {
            for id in doc.elements_with_attr(attr) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }

        for id in ids {
            if !doc.is_attached(id) {
                continue;
            }
            let is_hyperlink = doc.tag_name(id) == Some("a");

            for attr in REFERENCE_ATTRS {
                let Some(value) = doc.attr(id, attr).map(str::to_string) else {
                    continue;
                };
                let resolved = resolve_reference(&value, &page.url).map_err(|source| {
                    DocsetError::InvalidReference {
                        page: page.url.to_string(),
                        reference: value.clone(),
                        source,
                    }
                })?;
                let Some(target) = resolved else {
                    continue;
                };

                let rewrite = if is_hyperlink {
                    self.localize_link(&target, page, &prefix).await?
                } else {
                    self.localize_resource(&target, page, &prefix).await?
                };

                match rewrite {
                    Rewrite::Set(new_value) => doc.set_attr(id, attr, &new_value),
                    Rewrite::Remove => {
                        doc.detach(id);
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Localizes a non-hyperlink reference (image, stylesheet, script, ...)
    ///
    /// Resources stay at the depth of the page that references them.
    async fn localize_resource(
        &mut self,
        target: &Url,
        page: &FetchTarget,
        prefix: &str,
    ) -> Result<Rewrite> {
        let suffix = match self.scheduler.visit(target) {
            Some(Visit::Missing) => return Ok(Rewrite::Remove),
            Some(Visit::Saved { suffix }) => suffix,
            None => {
                let response = fetch_url(&self.client, &without_fragment(target)).await?;

                if response.is_not_found() {
                    self.scheduler.mark(target, Visit::Missing);
                    self.report.resources_missing += 1;
                    self.observer.resource_missing(target, &page.url);
                    return Ok(Rewrite::Remove);
                }
                if !response.is_ok() {
                    return Err(DocsetError::Status {
                        url: target.to_string(),
                        status: response.status,
                    });
                }

                let fetched = FetchTarget::new(response, page.depth, Role::Resource);
                let suffix = fetched.suffix;
                self.scheduler.mark(target, Visit::Saved { suffix });
                self.scheduler.push(fetched);
                suffix
            }
        };

        Ok(Rewrite::Set(rewritten_url(target, prefix, suffix)))
    }

    /// Localizes a hyperlink according to where it points
    async fn localize_link(
        &mut self,
        target: &Url,
        page: &FetchTarget,
        prefix: &str,
    ) -> Result<Rewrite> {
        let scope = classify_link(&page.url, target);
        if scope.is_untouched() {
            return Ok(Rewrite::Set(target.to_string()));
        }
        if scope == LinkScope::SamePage {
            return Ok(Rewrite::Set(rewritten_url(target, prefix, HTML_SUFFIX)));
        }
        if !scope.may_recurse() || !self.scheduler.should_descend(page.depth, target.path()) {
            return Ok(Rewrite::Set(target.to_string()));
        }

        let suffix = match self.scheduler.visit(target) {
            Some(Visit::Missing) => return Ok(Rewrite::Set(target.to_string())),
            Some(Visit::Saved { suffix }) => suffix,
            None => {
                let response = fetch_url(&self.client, &without_fragment(target)).await?;
                let fetched = FetchTarget::new(response, page.depth + 1, Role::Page);
                let suffix = fetched.suffix;
                self.scheduler.mark(target, Visit::Saved { suffix });
                self.scheduler.push(fetched);
                suffix
            }
        };

        Ok(Rewrite::Set(rewritten_url(target, prefix, suffix)))
    }
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}
