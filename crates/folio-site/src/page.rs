//! Post metadata and rendered post pages.

use chrono::NaiveDate;
use folio_content::Document;
use folio_renderer::HeadingEntry;
use serde::Serialize;

/// Display metadata of a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostMeta {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Human-readable date, e.g. `January 5, 2024`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Parsed publication date, when the front matter date parses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub read_time: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl PostMeta {
    /// Site-relative URL of the post.
    #[must_use]
    pub fn url(&self) -> String {
        format!("/blog/{}", self.slug)
    }
}

impl From<&Document> for PostMeta {
    fn from(doc: &Document) -> Self {
        Self {
            slug: doc.slug.clone(),
            title: doc.title.clone(),
            description: doc.description.clone(),
            date: doc.display_date(),
            published: doc.published,
            author: doc.author.clone(),
            image: doc.image.clone(),
            read_time: doc.read_time.clone(),
            tags: doc.tags.clone(),
        }
    }
}

/// A rendered post.
#[derive(Clone, Debug)]
pub struct PostPage {
    pub meta: PostMeta,
    /// Rendered article body, without chrome.
    pub content: String,
    /// Second-level headings of the body, in document order.
    pub toc: Vec<HeadingEntry>,
    /// Problems found while rendering, such as unknown code languages.
    pub warnings: Vec<String>,
    /// Complete HTML page.
    pub html: String,
}

/// Newest first. Undated posts go last, ties break by slug.
pub fn sort_newest_first(posts: &mut [PostMeta]) {
    posts.sort_by(|a, b| {
        b.published
            .cmp(&a.published)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}
