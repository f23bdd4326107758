use crate::{DocsetError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// The fixed layout of a `<name>.docset` bundle
#[derive(Debug, Clone)]
pub struct DocTree {
    bundle: PathBuf,
    documents: PathBuf,
    info_plist: PathBuf,
    db: PathBuf,
}

impl DocTree {
    /// Lays out a docset below `root`
    ///
    /// An empty `root` means the current working directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use docset_ripple::DocTree;
    /// use std::path::Path;
    ///
    /// let tree = DocTree::new("/tmp/docsets", "resty");
    /// assert_eq!(
    ///     tree.documents(),
    ///     Path::new("/tmp/docsets/resty.docset/Contents/Resources/Documents")
    /// );
    /// assert_eq!(tree.info_plist(), Path::new("/tmp/docsets/resty.docset/Info.plist"));
    /// ```
    pub fn new(root: impl AsRef<Path>, name: &str) -> Self {
        let root = root.as_ref();
        let root = if root.as_os_str().is_empty() {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        } else {
            root.to_path_buf()
        };

        let bundle = root.join(format!("{}.docset", name));
        let resources = bundle.join("Contents").join("Resources");

        Self {
            documents: resources.join("Documents"),
            info_plist: bundle.join("Info.plist"),
            db: resources.join("docSet.dsidx"),
            bundle,
        }
    }

    /// The `<name>.docset` directory itself
    pub fn bundle(&self) -> &Path {
        &self.bundle
    }

    /// Root of all saved pages and resources
    pub fn documents(&self) -> &Path {
        &self.documents
    }

    pub fn info_plist(&self) -> &Path {
        &self.info_plist
    }

    /// The SQLite search index
    pub fn db(&self) -> &Path {
        &self.db
    }

    /// Creates the Documents directory and its parents
    pub fn mkdir(&self) -> Result<()> {
        fs::create_dir_all(&self.documents).map_err(|e| DocsetError::io(&self.documents, e))
    }

    /// Removes the Documents directory with everything below it
    ///
    /// A missing directory is not an error.
    pub fn rm(&self) -> Result<()> {
        match fs::remove_dir_all(&self.documents) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DocsetError::io(&self.documents, e)),
        }
    }

    /// Absolute path of a document given its path below the Documents root
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - A path inside the Documents root
    /// * `Err(DocsetError::UnsafePath)` - `local_path` is empty or has a
    ///   `..`, `.`, root or prefix component
    pub fn document_path(&self, local_path: &str) -> Result<PathBuf> {
        let relative = Path::new(local_path.trim_start_matches('/'));
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if relative.as_os_str().is_empty() || !contained {
            return Err(DocsetError::UnsafePath {
                local_path: local_path.to_string(),
            });
        }
        Ok(self.documents.join(relative))
    }

    /// Saves a raw resource unless a file already exists at its location
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The file was written
    /// * `Ok(false)` - A file was already there and was left untouched
    /// * `Err(DocsetError::UnsafePath)` - The path leaves the Documents root
    /// * `Err(DocsetError::Io)` - Creating directories or writing failed
    pub fn save_file(&self, local_path: &str, body: &[u8]) -> Result<bool> {
        let path = self.document_path(local_path)?;
        create_parent(&path)?;

        match fs::metadata(&path) {
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(DocsetError::io(&path, e)),
        }

        fs::write(&path, body).map_err(|e| DocsetError::io(&path, e))?;
        Ok(true)
    }

    /// Writes a serialized page, replacing any previous content
    pub fn write_document(&self, local_path: &str, html: &str) -> Result<PathBuf> {
        let path = self.document_path(local_path)?;
        create_parent(&path)?;
        fs::write(&path, html).map_err(|e| DocsetError::io(&path, e))?;
        Ok(path)
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
    }
    Ok(())
}
