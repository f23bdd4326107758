//! Scheduler for the crawl work queue
//!
//! This module handles:
//! - The breadth-first queue of fetched targets awaiting processing
//! - The visited map that guarantees one fetch per `(host, path)`
//! - The depth and sub-path rules deciding whether a hyperlink recurses

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::FetchResponse;
use crate::url::{local_path, visit_key, VisitKey};
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use url::Url;

/// How a fetched target is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Parsed, rewritten, indexed and written as HTML
    Page,
    /// Saved byte for byte
    Resource,
}

/// Outcome of the single fetch issued for a visit key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Fetched with status 200, saved with this suffix
    Saved { suffix: &'static str },
    /// Resource answered 404, referring elements are removed
    Missing,
}

/// One unit of crawl work, already fetched
#[derive(Debug)]
pub struct FetchTarget {
    pub url: Url,
    /// Page level, 0 for the seed
    pub depth: u32,
    pub role: Role,
    /// Suffix forced onto the local path
    pub suffix: &'static str,
    pub response: FetchResponse,
}

impl FetchTarget {
    /// Classifies a fetched response
    ///
    /// A page that is not served as HTML is downgraded to a resource.
    pub fn new(response: FetchResponse, depth: u32, role: Role) -> Self {
        let role = match role {
            Role::Page if !response.is_html() => Role::Resource,
            role => role,
        };
        Self {
            url: response.url.clone(),
            depth,
            role,
            suffix: response.suffix(),
            response,
        }
    }

    /// Path of the target below the Documents root
    pub fn local_path(&self) -> String {
        local_path(&self.url, self.suffix)
    }
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "url:{} localPath:{} depth:{} role:{:?}",
            self.url,
            self.local_path(),
            self.depth,
            self.role
        )
    }
}

/// Scheduler manages the work queue and the visited map
pub struct Scheduler {
    /// Targets waiting to be processed, in discovery order
    queue: VecDeque<FetchTarget>,

    /// One entry per key ever fetched in this build
    visited: HashMap<VisitKey, Visit>,

    /// Number of page levels to build
    max_depth: u32,

    sub_path_regex: Option<Regex>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration, already normalized
    ///
    /// # Returns
    ///
    /// * `Ok(Scheduler)` - An empty scheduler
    /// * `Err(ConfigError::InvalidPattern)` - The sub-path regex does not compile
    pub fn new(config: &CrawlerConfig) -> ConfigResult<Self> {
        let sub_path_regex = match config.sub_path_regex.as_deref().filter(|r| !r.is_empty()) {
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                ConfigError::InvalidPattern(format!("crawler.sub-path-regex '{}': {}", pattern, e))
            })?),
            None => None,
        };

        Ok(Self {
            queue: VecDeque::new(),
            visited: HashMap::new(),
            max_depth: config.max_depth.max(1),
            sub_path_regex,
        })
    }

    /// Returns the recorded outcome for the key of `url`, if it was fetched
    pub fn visit(&self, url: &Url) -> Option<Visit> {
        self.visited.get(&visit_key(url)).copied()
    }

    /// Records the outcome of the fetch issued for `url`
    pub fn mark(&mut self, url: &Url, visit: Visit) {
        self.visited.insert(visit_key(url), visit);
    }

    /// Returns true if a hyperlink found on a page at `depth` may lead to a
    /// new page at `path`
    pub fn should_descend(&self, depth: u32, path: &str) -> bool {
        if depth + 1 >= self.max_depth {
            return false;
        }
        match &self.sub_path_regex {
            Some(regex) => regex.is_match(path),
            None => true,
        }
    }

    /// Adds a fetched target to the back of the queue
    pub fn push(&mut self, target: FetchTarget) {
        self.queue.push_back(target);
    }

    /// Takes the oldest target from the queue
    pub fn pop(&mut self) -> Option<FetchTarget> {
        self.queue.pop_front()
    }

    /// Number of distinct keys fetched so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
