//! URL handling for docset builds
//!
//! This module maps crawled URLs onto the docset layout (local paths,
//! relative prefixes, rewritten references), names bundles, and classifies
//! where a hyperlink points relative to the page it was found on.

mod bundle;
mod paths;

use url::Url;

pub use bundle::BundleNamer;
pub use paths::{
    decoded_path, host_key, is_html, local_path, relative_prefix, rewritten_url, suffix_for,
    visit_key, VisitKey, HTML_SUFFIX, SVG_SUFFIX,
};

/// Where a hyperlink points, seen from the page that carries it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Different host (or port) - left untouched
    External,
    /// Same host and identical path - rewritten as an HTML page
    SamePage,
    /// Same host but not below the page path - left untouched
    Outside,
    /// Same host and below the page path - candidate for recursion
    Descendant,
}

impl LinkScope {
    /// Returns true if the link may lead to a new page being crawled
    pub fn may_recurse(&self) -> bool {
        matches!(self, Self::Descendant)
    }

    /// Returns true if the link is written back as an absolute URL
    pub fn is_untouched(&self) -> bool {
        matches!(self, Self::External | Self::Outside)
    }
}

/// Classifies a hyperlink target against the page it was found on
///
/// Descendants are decided by a plain string prefix on the path, so
/// `/docs/pkg` considers both `/docs/pkg/sub` and `/docs/pkgextra` below it.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docset_ripple::url::{classify_link, LinkScope};
///
/// let page = Url::parse("https://example.com/docs/pkg").unwrap();
/// let sub = Url::parse("https://example.com/docs/pkg/sub").unwrap();
/// assert_eq!(classify_link(&page, &sub), LinkScope::Descendant);
/// ```
pub fn classify_link(page: &Url, target: &Url) -> LinkScope {
    if host_key(page) != host_key(target) {
        return LinkScope::External;
    }
    if page.path() == target.path() {
        return LinkScope::SamePage;
    }
    if !target.path().starts_with(page.path()) {
        return LinkScope::Outside;
    }
    LinkScope::Descendant
}

/// Resolves an `href`/`src` value against the page URL
///
/// # Returns
///
/// * `Ok(Some(url))` - An absolute `http`/`https` URL
/// * `Ok(None)` - Empty value or a non-web scheme (`mailto:`, `data:`, ...)
/// * `Err(e)` - The value is not a parseable reference
pub fn resolve_reference(value: &str, page: &Url) -> Result<Option<Url>, url::ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let resolved = page.join(value)?;
    match resolved.scheme() {
        "http" | "https" => Ok(Some(resolved)),
        _ => Ok(None),
    }
}
