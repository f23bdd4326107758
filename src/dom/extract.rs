use crate::config::{validate_selector, IndexNameKind, IndexRule};
use crate::docset::IndexEntry;
use crate::dom::transform::DASH_ANCHOR_CLASS;
use crate::dom::{new_element, Document};
use crate::ConfigResult;
use ego_tree::NodeId;
use scraper::Selector;

struct CompiledRule {
    selector: Selector,
    rule: IndexRule,
}

/// Mines index entries from a page and marks them with Dash anchors
pub struct IndexExtractor {
    rules: Vec<CompiledRule>,
}

/// Builds the Dash anchor name for an entry
///
/// The entry name is escaped as a single path segment: `/`, `?`, `%`,
/// spaces and other reserved characters are percent-encoded while the
/// sub-delimiters `$&+:=@` are kept literally.
///
/// # Examples
///
/// ```
/// use docset_ripple::dom::extract::anchor_name;
///
/// assert_eq!(anchor_name("New", "Function", 1), "//dash_ref_New/Function/New/1");
/// assert_eq!(anchor_name("a b", "Type", 0), "//dash_ref_a%20b/Type/a%20b/0");
/// assert_eq!(anchor_name("operator==", "Function", 0), "//dash_ref_operator==/Function/operator==/0");
/// ```
pub fn anchor_name(name: &str, entry_type: &str, level: u32) -> String {
    let escaped = escape_segment(name);
    format!("//dash_ref_{}/{}/{}/{}", escaped, entry_type, escaped, level)
}

/// Escapes, as `urlencoding` does, then restores the sub-delimiters a path
/// segment may carry literally
///
/// Every `%` left in the encoded text starts an escape, so replacing whole
/// escapes never touches a decoded byte.
fn escape_segment(name: &str) -> String {
    const KEPT: [(&str, &str); 6] = [
        ("%24", "$"),
        ("%26", "&"),
        ("%2B", "+"),
        ("%3A", ":"),
        ("%3D", "="),
        ("%40", "@"),
    ];
    KEPT.iter()
        .fold(urlencoding::encode(name).into_owned(), |escaped, (code, kept)| {
            escaped.replace(code, kept)
        })
}

impl IndexExtractor {
    /// Compiles the selectors of all rules
    pub fn new(rules: &[IndexRule]) -> ConfigResult<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    selector: validate_selector(&rule.selector)?,
                    rule: rule.clone(),
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Inserts an anchor before every named match and returns the entries
    ///
    /// Rules run in configuration order and matches in document order.
    /// Matches whose derived name is empty are skipped entirely. Rules marked
    /// `anchor-only` get anchors but contribute no entries.
    ///
    /// # Arguments
    ///
    /// * `doc` - The page, already stripped and rewritten
    /// * `bundle` - Bundle name of the page
    /// * `local_path` - Path of the page below the Documents root
    pub fn extract(&self, doc: &mut Document, bundle: &str, local_path: &str) -> Vec<IndexEntry> {
        let mut entries = Vec::new();

        for compiled in &self.rules {
            let rule = &compiled.rule;
            for id in doc.select_ids(&compiled.selector) {
                let name = entry_name(doc, id, rule);
                if name.is_empty() {
                    tracing::trace!("Skipping unnamed match of '{}'", rule.selector);
                    continue;
                }

                let anchor = anchor_name(&name, &rule.entry_type, rule.level);
                doc.insert_before(
                    id,
                    new_element("a", &[("class", DASH_ANCHOR_CLASS), ("name", &anchor)]),
                );

                if !rule.anchor_only {
                    entries.push(IndexEntry {
                        name,
                        entry_type: rule.entry_type.clone(),
                        bundle: bundle.to_string(),
                        local_path: local_path.to_string(),
                        anchor,
                    });
                }
            }
        }

        entries
    }
}

fn entry_name(doc: &Document, id: NodeId, rule: &IndexRule) -> String {
    match rule.name.kind {
        IndexNameKind::Text => doc.text(id),
        IndexNameKind::Attr => doc.attr(id, &rule.name.value).unwrap_or_default().to_string(),
        IndexNameKind::Constant => rule.name.value.clone(),
    }
}
