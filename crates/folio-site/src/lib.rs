//! Page composition for Folio.
//!
//! [`Site`] looks posts up in a [`ContentStore`](folio_content::ContentStore),
//! renders them through the Markdown pipeline and wraps the result in page
//! chrome: navigation bar, metadata header and an "On this page" aside built
//! from the post's second-level headings.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use folio_content::FsContentStore;
//! use folio_site::{Site, SiteConfig};
//!
//! let posts = Arc::new(FsContentStore::new("posts"));
//! let pages = Arc::new(FsContentStore::new("pages"));
//! let site = Site::new(posts, pages, SiteConfig::default());
//!
//! match site.render("hello") {
//!     Ok(page) => println!("{}", page.html),
//!     Err(e) if e.is_not_found() => println!("{}", site.not_found("/blog/hello")),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

mod page;
mod site;
mod template;

pub use page::{PostMeta, PostPage, sort_newest_first};
pub use site::{RenderError, Site, SiteConfig};

pub use folio_renderer::HeadingEntry;
