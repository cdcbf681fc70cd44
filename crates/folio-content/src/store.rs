//! Content store trait and filesystem backend.
//!
//! A store maps slugs to [`Document`]s. Stores never cache: every call
//! re-reads the backing text, so edits show up on the next request.
//!
//! # Duplicate slugs
//!
//! When two files declare the same slug, the first one in directory order
//! (file name, ascending) wins. Later duplicates are dropped from
//! [`ContentStore::scan`] and logged.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::document::Document;

/// File extensions recognized as content.
const EXTENSIONS: &[&str] = &["md", "markdown"];

/// Content store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document carries the requested slug.
    #[error("Document not found: {0}")]
    NotFound(String),
    /// Backing storage could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Whether this is a missing-document error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Lookup of content documents by slug.
pub trait ContentStore: Send + Sync {
    /// All documents in directory order, one per slug.
    fn scan(&self) -> Result<Vec<Document>, StoreError>;

    /// The document with exactly this slug.
    ///
    /// Returns [`StoreError::NotFound`] when no document matches.
    fn get(&self, slug: &str) -> Result<Document, StoreError>;
}

/// Drop documents whose slug was already seen.
pub(crate) fn first_per_slug(documents: impl IntoIterator<Item = Document>) -> Vec<Document> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| {
            let fresh = seen.insert(doc.slug.clone());
            if !fresh {
                tracing::warn!(slug = %doc.slug, "Duplicate slug, keeping first document");
            }
            fresh
        })
        .collect()
}

/// Store backed by a flat directory of Markdown files.
///
/// Hidden files and files starting with `_` are ignored. A missing
/// directory behaves as an empty store.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    dir: PathBuf,
}

impl FsContentStore {
    /// Create a store over `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this store reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Content file paths, sorted by file name.
    fn entries(&self) -> Result<Vec<PathBuf>, StoreError> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut paths: Vec<PathBuf> = read_dir
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_content_file(path))
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Read and parse documents lazily, skipping unreadable files.
    fn documents(&self) -> Result<impl Iterator<Item = Document>, StoreError> {
        Ok(self.entries()?.into_iter().filter_map(|path| {
            load(&path)
                .inspect_err(|e| tracing::warn!(error = %e, "Skipping unreadable content file"))
                .ok()
        }))
    }
}

impl ContentStore for FsContentStore {
    fn scan(&self) -> Result<Vec<Document>, StoreError> {
        Ok(first_per_slug(self.documents()?))
    }

    fn get(&self, slug: &str) -> Result<Document, StoreError> {
        self.documents()?
            .find(|doc| doc.slug == slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_owned()))
    }
}

fn is_content_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') || name.starts_with('_') {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

fn load(path: &Path) -> Result<Document, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    Ok(Document::parse(&stem, &raw))
}
