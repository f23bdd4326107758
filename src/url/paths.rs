use std::borrow::Cow;
use url::Url;

/// Suffix forced onto pages served as `text/html`
pub const HTML_SUFFIX: &str = ".html";

/// Suffix forced onto images served as `image/svg+xml`
pub const SVG_SUFFIX: &str = ".svg";

/// Deduplication key of a URL: `host[:port]` plus path
///
/// Query string and fragment are deliberately not part of the key, so
/// `https://example.com/a?x=1` and `https://example.com/a#top` are the same
/// target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitKey(String);

impl VisitKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VisitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the host of a URL including an explicit port, if any
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docset_ripple::url::host_key;
///
/// assert_eq!(host_key(&Url::parse("https://example.com/a").unwrap()), "example.com");
/// assert_eq!(host_key(&Url::parse("http://127.0.0.1:8080/a").unwrap()), "127.0.0.1:8080");
/// ```
pub fn host_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Returns the path of a URL with each segment percent-decoded
///
/// Decoding never changes the segment structure: a segment whose decoded
/// form would contain a separator, be `.` or `..`, or not be valid UTF-8 is
/// kept as served.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docset_ripple::url::decoded_path;
///
/// let url = Url::parse("https://example.com/docs/my%20pkg").unwrap();
/// assert_eq!(decoded_path(&url), "/docs/my pkg");
///
/// let url = Url::parse("https://example.com/docs/a%2F..%2Fb").unwrap();
/// assert_eq!(decoded_path(&url), "/docs/a%2F..%2Fb");
/// ```
pub fn decoded_path(url: &Url) -> String {
    url.path()
        .split('/')
        .map(decode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn decode_segment(segment: &str) -> Cow<'_, str> {
    match urlencoding::decode(segment) {
        Ok(decoded) if is_plain_segment(&decoded) => decoded,
        _ => Cow::Borrowed(segment),
    }
}

fn is_plain_segment(segment: &str) -> bool {
    segment != "." && segment != ".." && !segment.contains(['/', '\\', '\0'])
}

/// Builds the deduplication key for a URL
pub fn visit_key(url: &Url) -> VisitKey {
    VisitKey(format!("{}{}", host_key(url), url.path()))
}

/// Infers the suffix a saved file needs from the served content type
///
/// Returns an empty suffix when the content type implies no extension or
/// when `path` already carries the implied extension.
pub fn suffix_for(content_type: &str, path: &str) -> &'static str {
    let content_type = content_type.to_lowercase();
    if content_type.contains("image/svg+xml") && !path.ends_with(SVG_SUFFIX) {
        SVG_SUFFIX
    } else if content_type.contains("text/html") && !path.ends_with(HTML_SUFFIX) {
        HTML_SUFFIX
    } else {
        ""
    }
}

/// Returns true if the content type is HTML
pub fn is_html(content_type: &str) -> bool {
    content_type.to_lowercase().contains("text/html")
}

/// Maps a URL to its path below the Documents root
///
/// The result is `host[:port]` followed by the decoded URL path, with
/// `suffix` appended unless the path already ends with it.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docset_ripple::url::local_path;
///
/// let url = Url::parse("https://example.com/docs/pkg").unwrap();
/// assert_eq!(local_path(&url, ".html"), "example.com/docs/pkg.html");
///
/// let url = Url::parse("https://example.com/docs/pkg.html").unwrap();
/// assert_eq!(local_path(&url, ".html"), "example.com/docs/pkg.html");
/// ```
pub fn local_path(url: &Url, suffix: &str) -> String {
    let path = decoded_path(url);
    if path.ends_with(suffix) {
        format!("{}{}", host_key(url), path)
    } else {
        format!("{}{}{}", host_key(url), path, suffix)
    }
}

/// Returns the `..` chain leading from a document back to the Documents root
///
/// `local_path` is the document's path below the root as built by
/// [`local_path`]; one `..` is emitted per directory it sits in, so
/// `host/docs/pkg.html` gets `../..`.
pub fn relative_prefix(local_path: &str) -> String {
    let depth = local_path.trim_start_matches('/').matches('/').count();
    vec![".."; depth].join("/")
}

/// Rewrites an absolute URL into a reference relative to the current document
///
/// The suffix rule of [`local_path`] is applied to the path, the scheme is
/// stripped and `prefix` (from [`relative_prefix`]) is prepended. Query and
/// fragment are kept.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docset_ripple::url::rewritten_url;
///
/// let url = Url::parse("https://example.com/docs/pkg/sub#Func").unwrap();
/// assert_eq!(
///     rewritten_url(&url, "../..", ".html"),
///     "../../example.com/docs/pkg/sub.html#Func"
/// );
/// ```
pub fn rewritten_url(url: &Url, prefix: &str, suffix: &str) -> String {
    let mut local = url.clone();
    if !local.path().ends_with(suffix) {
        let path = format!("{}{}", local.path(), suffix);
        local.set_path(&path);
    }

    let scheme_prefix = format!("{}:/", local.scheme());
    let serialized = local.as_str();
    let stripped = serialized.strip_prefix(&scheme_prefix).unwrap_or(serialized);
    format!("{}{}", prefix, stripped)
}
