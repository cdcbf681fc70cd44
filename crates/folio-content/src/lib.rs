//! Content layer for Folio.
//!
//! Splits front matter from Markdown bodies and looks documents up by slug.
//!
//! # Example
//!
//! ```
//! use folio_content::Document;
//!
//! let doc = Document::parse("hello", "---\ntitle: Hello\n---\n## Section One\n");
//! assert_eq!(doc.title, "Hello");
//! assert_eq!(doc.slug, "hello");
//! assert_eq!(doc.body(), "## Section One\n");
//! ```

mod document;
pub mod frontmatter;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod store;

pub use document::Document;
pub use frontmatter::{FieldValue, Format, FrontMatter, split_front_matter};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockContentStore;
pub use store::{ContentStore, FsContentStore, StoreError};
