//! In-memory content store for tests.

use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::document::Document;
use crate::store::{ContentStore, StoreError, first_per_slug};

/// In-memory store for testing.
///
/// Files are kept in insertion order, which stands in for directory order.
///
/// # Example
///
/// ```ignore
/// use folio_content::{ContentStore, MockContentStore};
///
/// let store = MockContentStore::new()
///     .with_file("hello.md", "---\ntitle: Hello\n---\n## Section One");
///
/// let doc = store.get("hello").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockContentStore {
    files: RwLock<Vec<(String, String)>>,
    unavailable: bool,
}

impl MockContentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. The slug defaults to the name without its extension.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.files.write().unwrap().push((name.into(), raw.into()));
        self
    }

    /// Make every call fail with an I/O error.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Replace the text of an existing file, or add it.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, name: &str, raw: impl Into<String>) {
        let mut files = self.files.write().unwrap();
        let raw = raw.into();
        match files.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = raw,
            None => files.push((name.to_owned(), raw)),
        }
    }

    fn documents(&self) -> Result<Vec<Document>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Io {
                path: PathBuf::from("mock"),
                source: io::Error::other("mock store unavailable"),
            });
        }

        let files = self.files.read().unwrap();
        Ok(files
            .iter()
            .map(|(name, raw)| {
                let stem = name.rsplit_once('.').map_or(name.as_str(), |(stem, _)| stem);
                Document::parse(stem, raw)
            })
            .collect())
    }
}

impl ContentStore for MockContentStore {
    fn scan(&self) -> Result<Vec<Document>, StoreError> {
        Ok(first_per_slug(self.documents()?))
    }

    fn get(&self, slug: &str) -> Result<Document, StoreError> {
        self.documents()?
            .into_iter()
            .find(|doc| doc.slug == slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_get_and_scan() {
        let store = MockContentStore::new()
            .with_file("a.md", "---\ntitle: A\n---\n")
            .with_file("b.md", "---\ntitle: B\nslug: a\n---\n");

        assert_eq!(store.get("a").unwrap().title, "A");
        assert_eq!(store.scan().unwrap().len(), 1);
    }

    #[test]
    fn test_mock_set_file_replaces_content() {
        let store = MockContentStore::new().with_file("a.md", "Old");
        store.set_file("a.md", "New");

        assert_eq!(store.get("a").unwrap().body(), "New");
    }

    #[test]
    fn test_mock_unavailable() {
        let store = MockContentStore::new().with_file("a.md", "x").unavailable();

        assert!(matches!(store.get("a"), Err(StoreError::Io { .. })));
        assert!(store.scan().is_err());
    }
}
