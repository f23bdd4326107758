use crate::config::{validate_selector, PageConfig};
use crate::dom::{new_comment, new_element, Document};
use crate::ConfigResult;
use scraper::Selector;

/// Class carried by every synthesized Dash anchor
pub const DASH_ANCHOR_CLASS: &str = "dashAnchor";

struct AttrOverride {
    selector: Selector,
    key: String,
    value: String,
}

/// Page-level rewrites that do not depend on the crawl
///
/// Removal and attribute overrides run before references are discovered, so
/// removed nodes never cause a fetch. The comment and `<link>` insertions run
/// last, after anchors have been placed.
pub struct DomTransformer {
    remove: Vec<Selector>,
    overrides: Vec<AttrOverride>,
    html: Selector,
    head: Selector,
    anchors: Selector,
}

impl DomTransformer {
    /// Compiles the page rules
    ///
    /// # Returns
    ///
    /// * `Ok(DomTransformer)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - A selector does not parse
    pub fn new(page: &PageConfig) -> ConfigResult<Self> {
        let remove = page
            .remove_node_selector
            .iter()
            .map(|s| validate_selector(s))
            .collect::<ConfigResult<Vec<_>>>()?;

        let overrides = page
            .set_attrs
            .iter()
            .map(|rule| {
                Ok(AttrOverride {
                    selector: validate_selector(&rule.selector)?,
                    key: rule.attr.key.clone(),
                    value: rule.attr.value.clone(),
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            remove,
            overrides,
            html: validate_selector("html")?,
            head: validate_selector("head")?,
            anchors: validate_selector(&format!(".{}", DASH_ANCHOR_CLASS))?,
        })
    }

    /// Runs the removal pass and then the attribute pass
    pub fn prepare(&self, doc: &mut Document) {
        let removed = self.remove_nodes(doc);
        let updated = self.set_attrs(doc);
        tracing::debug!("Removed {} nodes, set {} attributes", removed, updated);
    }

    /// Detaches every node matching a removal selector, rule by rule
    pub fn remove_nodes(&self, doc: &mut Document) -> usize {
        let mut removed = 0;
        for selector in &self.remove {
            for id in doc.select_ids(selector) {
                doc.detach(id);
                removed += 1;
            }
        }
        removed
    }

    /// Applies every attribute override to the nodes it selects
    pub fn set_attrs(&self, doc: &mut Document) -> usize {
        let mut updated = 0;
        for rule in &self.overrides {
            for id in doc.select_ids(&rule.selector) {
                doc.set_attr(id, &rule.key, &rule.value);
                updated += 1;
            }
        }
        updated
    }

    /// Inserts `Online page at <url>` as the first child of `<html>`
    pub fn insert_online_comment(&self, doc: &mut Document, url: &str) {
        if let Some(root) = doc.select_first(&self.html) {
            doc.prepend_child(root, new_comment(&format!("Online page at {}", url)));
        }
    }

    /// Appends a `<link href=NAME>` to `<head>` for every Dash anchor
    ///
    /// Returns the number of links inserted.
    pub fn insert_anchor_links(&self, doc: &mut Document) -> usize {
        let Some(head) = doc.select_first(&self.head) else {
            return 0;
        };

        let names: Vec<String> = doc
            .select_ids(&self.anchors)
            .into_iter()
            .map(|id| doc.attr(id, "name").unwrap_or_default().to_string())
            .collect();

        for name in &names {
            doc.append_child(head, new_element("link", &[("href", name)]));
        }
        names.len()
    }
}
