use std::fmt;

/// Dash entry type of the per-page entry
pub const PACKAGE_TYPE: &str = "Package";

/// One searchable entry of the docset index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub entry_type: String,
    pub bundle: String,
    /// Path of the page below the Documents root
    pub local_path: String,
    /// Anchor name inside the page, empty for whole-page entries
    pub anchor: String,
}

impl IndexEntry {
    /// Creates the `Package` entry that stands for a whole page
    pub fn package(bundle: &str, local_path: &str) -> Self {
        Self {
            name: bundle.to_string(),
            entry_type: PACKAGE_TYPE.to_string(),
            bundle: bundle.to_string(),
            local_path: local_path.to_string(),
            anchor: String::new(),
        }
    }

    /// Encodes the entry location the way Dash expects in `searchIndex.path`
    ///
    /// # Examples
    ///
    /// ```
    /// use docset_ripple::IndexEntry;
    ///
    /// let entry = IndexEntry::package("resty", "example.com/pkg.html");
    /// assert_eq!(
    ///     entry.href(),
    ///     "<dash_entry_name=resty><dash_entry_originalName=resty.resty>\
    ///      <dash_entry_menuDescription=resty>example.com/pkg.html#"
    /// );
    /// ```
    pub fn href(&self) -> String {
        format!(
            "<dash_entry_name={}><dash_entry_originalName={}.{}><dash_entry_menuDescription={}>{}#{}",
            self.name, self.bundle, self.name, self.bundle, self.local_path, self.anchor
        )
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name:{} type:{} href:{}", self.name, self.entry_type, self.href())
    }
}
