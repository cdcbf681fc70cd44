//! Post lookup and page composition.
//!
//! `Site` holds no per-request state: every call reads the store again and
//! renders from scratch, so it can be shared behind an `Arc` and called from
//! any number of threads.

use std::sync::Arc;

use folio_content::{ContentStore, Document, StoreError};
use folio_mail::ContactOutcome;
use folio_renderer::{MarkdownPipeline, PipelineOptions, toc};

use crate::page::{PostMeta, PostPage, sort_newest_first};
use crate::template::{self, Chrome};

/// Slug of the optional page rendered at `/about`.
const ABOUT_SLUG: &str = "about";

/// Error returned when a page cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No post carries the requested slug.
    #[error("Document not found: {0}")]
    NotFound(String),
    /// The content store failed.
    #[error(transparent)]
    Store(StoreError),
}

impl RenderError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<StoreError> for RenderError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(slug) => Self::NotFound(slug),
            other => Self::Store(other),
        }
    }
}

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Site name shown in the navigation bar and page titles.
    pub title: String,
    /// Tagline for the home page and the `description` meta tag.
    pub description: String,
    pub author: Option<String>,
    /// Posts listed on the home page.
    pub recent_posts: usize,
    /// Add a copy button to code blocks.
    pub copy_button: bool,
    /// Add a self-link to every heading.
    pub heading_links: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_owned(),
            description: "Notes, projects and writing.".to_owned(),
            author: None,
            recent_posts: 3,
            copy_button: true,
            heading_links: true,
        }
    }
}

/// Blog and portfolio pages over a pair of content stores.
pub struct Site {
    posts: Arc<dyn ContentStore>,
    pages: Arc<dyn ContentStore>,
    pipeline: MarkdownPipeline,
    config: SiteConfig,
}

impl Site {
    /// Create a site reading posts and standalone pages from separate stores.
    #[must_use]
    pub fn new(
        posts: Arc<dyn ContentStore>,
        pages: Arc<dyn ContentStore>,
        config: SiteConfig,
    ) -> Self {
        let pipeline = MarkdownPipeline::new()
            .with_options(PipelineOptions {
                standalone: false,
                copy_button: config.copy_button,
                heading_links: config.heading_links,
                highlight: true,
            })
            .with_link_base("/blog");
        Self::with_pipeline(posts, pages, config, pipeline)
    }

    /// Create a site with a preconfigured pipeline.
    #[must_use]
    pub fn with_pipeline(
        posts: Arc<dyn ContentStore>,
        pages: Arc<dyn ContentStore>,
        config: SiteConfig,
        pipeline: MarkdownPipeline,
    ) -> Self {
        Self {
            posts,
            pages,
            pipeline,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    fn chrome(&self) -> Chrome<'_> {
        Chrome {
            title: &self.config.title,
            description: &self.config.description,
            author: self.config.author.as_deref(),
        }
    }

    /// Render the post with this slug inside the page chrome.
    ///
    /// Returns [`RenderError::NotFound`] when no post matches. The caller
    /// decides what to show instead, typically [`Site::not_found`].
    pub fn render(&self, slug: &str) -> Result<PostPage, RenderError> {
        let document = self.posts.get(slug)?;
        Ok(self.compose(&document))
    }

    fn compose(&self, document: &Document) -> PostPage {
        let result = self.pipeline.render(document.body());
        for warning in &result.warnings {
            tracing::warn!(slug = %document.slug, %warning, "Render warning");
        }

        let toc: Vec<_> = toc::headings(&result.html).collect();
        let meta = PostMeta::from(document);
        let html = template::post(&self.chrome(), &meta, &result.html, &toc);

        PostPage {
            meta,
            content: result.html,
            toc,
            warnings: result.warnings,
            html,
        }
    }

    /// Metadata of every post, newest first.
    pub fn posts(&self) -> Result<Vec<PostMeta>, RenderError> {
        let mut posts: Vec<PostMeta> = self.posts.scan()?.iter().map(PostMeta::from).collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    /// Home page with the most recent posts.
    pub fn home(&self) -> Result<String, RenderError> {
        let mut posts = self.posts()?;
        posts.truncate(self.config.recent_posts);
        Ok(template::home(&self.chrome(), &posts))
    }

    /// Index of all posts.
    pub fn blog_index(&self) -> Result<String, RenderError> {
        let posts = self.posts()?;
        Ok(template::blog_index(&self.chrome(), &posts))
    }

    /// About page from the `about` document in the pages store.
    ///
    /// Falls back to a short page built from the site description when
    /// there is no such document.
    pub fn about(&self) -> Result<String, RenderError> {
        let chrome = self.chrome();
        let content = match self.pages.get(ABOUT_SLUG) {
            Ok(document) => self.pipeline.render(document.body()).html,
            Err(StoreError::NotFound(_)) => template::default_about(&chrome),
            Err(e) => return Err(RenderError::Store(e)),
        };
        Ok(template::about(&chrome, &content))
    }

    /// Contact form, with a banner when `status` is set.
    #[must_use]
    pub fn contact(&self, status: Option<ContactOutcome>) -> String {
        template::contact(&self.chrome(), status)
    }

    /// Not-found page for `path`.
    #[must_use]
    pub fn not_found(&self, path: &str) -> String {
        template::not_found(&self.chrome(), path)
    }
}
