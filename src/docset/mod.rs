//! The on-disk docset bundle
//!
//! Layout of the `<name>.docset` directory, Info.plist rendering and the
//! entries that end up in the search index.

mod entry;
mod plist;
mod tree;

pub use entry::{IndexEntry, PACKAGE_TYPE};
pub use plist::{render_info_plist, write_info_plist};
pub use tree::DocTree;
