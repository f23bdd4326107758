use serde::Deserialize;

/// Main configuration structure for a docset build
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub docset: DocsetConfig,
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub bundle_name: BundleNameConfig,
    pub plist: PlistConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub index: Vec<IndexRule>,
}

/// Output location of the docset
#[derive(Debug, Clone, Deserialize)]
pub struct DocsetConfig {
    /// Root directory the `<name>.docset` bundle is created in
    ///
    /// An empty path means the current directory.
    #[serde(default)]
    pub path: String,

    /// Docset name, `/` is replaced by `-` on load
    pub name: String,
}

/// Crawl scope configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Seed page of the documentation site
    pub url: String,

    /// Maximum number of page levels to build, the seed being level 0
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Only sub-pages whose URL path matches this regex are crawled
    #[serde(default)]
    pub sub_path_regex: Option<String>,
}

/// Pattern used to name the bundle of each page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleNameConfig {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub replace: Option<String>,
}

/// Values rendered into Info.plist
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlistConfig {
    pub cfbundle_identifier: String,

    /// Display name, also the default bundle name of index entries
    pub cfbundle_name: String,

    pub docset_platform_family: String,

    #[serde(default)]
    pub play_url: Option<String>,

    #[serde(default)]
    pub javascript_enabled: bool,

    #[serde(default)]
    pub fts_enabled: bool,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("docset-ripple/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Page rewriting rules applied before references are localized
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PageConfig {
    /// Every node matching one of these selectors is removed
    pub remove_node_selector: Vec<String>,

    /// Attribute overrides, applied in order
    pub set_attrs: Vec<SetAttr>,
}

/// One attribute override
#[derive(Debug, Clone, Deserialize)]
pub struct SetAttr {
    pub selector: String,
    pub attr: AttrValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttrValue {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// A selector-driven rule producing index entries
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndexRule {
    pub selector: String,

    /// Dash entry type (`Package`, `Function`, `Type`, `Section`, ...)
    #[serde(rename = "type")]
    pub entry_type: String,

    #[serde(default)]
    pub name: IndexName,

    /// TOC level encoded into the anchor name
    #[serde(default)]
    pub level: u32,

    /// Insert the anchor but do not emit an index entry
    #[serde(default)]
    pub anchor_only: bool,
}

/// How the name of an index entry is derived from a matched node
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexName {
    #[serde(rename = "type", default)]
    pub kind: IndexNameKind,

    /// Attribute name for `attr`, the fixed name for `constant`
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexNameKind {
    /// Concatenated descendant text
    #[default]
    Text,
    /// Value of the attribute named by `value`
    Attr,
    /// `value` itself
    Constant,
}

/// Values given on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub path: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub cfbundle: Option<String>,
    pub depth: Option<u32>,
    pub path_regex: Option<String>,
    pub bundle_pattern: Option<String>,
    pub bundle_replace: Option<String>,
}

impl ConfigOverrides {
    /// Returns true if no override is set
    pub fn is_empty(&self) -> bool {
        self.path.is_none()
            && self.name.is_none()
            && self.url.is_none()
            && self.cfbundle.is_none()
            && self.depth.is_none()
            && self.path_regex.is_none()
            && self.bundle_pattern.is_none()
            && self.bundle_replace.is_none()
    }
}

impl Config {
    /// Replaces file values with the non-empty command line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                *target = value.clone();
            }
        }
        fn set_opt(target: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                *target = Some(value.clone());
            }
        }

        set(&mut self.docset.path, &overrides.path);
        set(&mut self.docset.name, &overrides.name);
        set(&mut self.crawler.url, &overrides.url);
        set(&mut self.plist.cfbundle_name, &overrides.cfbundle);
        set_opt(&mut self.crawler.sub_path_regex, &overrides.path_regex);
        set_opt(&mut self.bundle_name.pattern, &overrides.bundle_pattern);
        set_opt(&mut self.bundle_name.replace, &overrides.bundle_replace);
        if let Some(depth) = overrides.depth {
            self.crawler.max_depth = depth;
        }
    }

    /// Normalizes values the crawl relies on
    ///
    /// `/` in the docset name becomes `-` and a max depth of 0 becomes 1.
    pub fn normalize(&mut self) {
        self.docset.name = self.docset.name.replace('/', "-");
        if self.crawler.max_depth == 0 {
            self.crawler.max_depth = 1;
        }
    }
}

fn default_max_depth() -> u32 {
    1
}
