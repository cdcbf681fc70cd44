//! The Markdown to HTML pipeline.

use std::sync::Arc;
use std::time::Instant;

use syntect::parsing::SyntaxSet;

use crate::document::{format_html, wrap_document};
use crate::highlight::SyntaxHighlighter;
use crate::html::HtmlBackend;
use crate::renderer::{MarkdownRenderer, RenderResult};

/// Title used for standalone documents without an H1.
const UNTITLED: &str = "Untitled";

/// Pipeline switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Wrap the fragment in a complete HTML document.
    pub standalone: bool,
    /// Add a copy button to code blocks.
    pub copy_button: bool,
    /// Add a self-link to every heading.
    pub heading_links: bool,
    /// Highlight fenced code blocks.
    pub highlight: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            standalone: false,
            copy_button: true,
            heading_links: true,
            highlight: true,
        }
    }
}

/// Markdown to HTML pipeline.
///
/// Stages run in a fixed order: parse, convert (heading ids, heading
/// self-links and code highlighting happen here), wrap when standalone,
/// then format. The pipeline only holds read-only configuration, so one
/// instance can render any number of documents, concurrently included.
#[derive(Clone)]
pub struct MarkdownPipeline {
    options: PipelineOptions,
    link_base: Option<String>,
    syntaxes: Arc<SyntaxSet>,
}

impl MarkdownPipeline {
    /// Pipeline with default options and the bundled syntax definitions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_syntaxes(Arc::new(SyntaxSet::load_defaults_newlines()))
    }

    /// Pipeline sharing an already loaded syntax set.
    #[must_use]
    pub fn with_syntaxes(syntaxes: Arc<SyntaxSet>) -> Self {
        Self {
            options: PipelineOptions::default(),
            link_base: None,
            syntaxes,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// URL prefix for links between content files, e.g. `/blog`.
    #[must_use]
    pub fn with_link_base(mut self, base: impl Into<String>) -> Self {
        self.link_base = Some(base.into());
        self
    }

    /// Render a Markdown body.
    ///
    /// Never fails: any input produces HTML. Problems with individual code
    /// blocks are reported in [`RenderResult::warnings`].
    pub fn render(&self, markdown: &str) -> RenderResult {
        let start = Instant::now();

        let mut renderer = MarkdownRenderer::<HtmlBackend>::new()
            .with_title_extraction()
            .with_heading_links(self.options.heading_links);
        if let Some(base) = &self.link_base {
            renderer = renderer.with_base_path(base.as_str());
        }
        if self.options.highlight {
            renderer = renderer.with_processor(
                SyntaxHighlighter::new(Arc::clone(&self.syntaxes))
                    .with_copy_button(self.options.copy_button),
            );
        }

        let mut result = renderer.render_markdown(markdown);

        if self.options.standalone {
            let title = result.title.as_deref().unwrap_or(UNTITLED);
            result.html = wrap_document(&result.html, title);
        }
        result.html = format_html(&result.html);

        tracing::debug!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            bytes = result.html.len(),
            warnings = result.warnings.len(),
            "Rendered markdown"
        );
        result
    }
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::toc;

    static SYNTAXES: LazyLock<Arc<SyntaxSet>> =
        LazyLock::new(|| Arc::new(SyntaxSet::load_defaults_newlines()));

    fn pipeline(options: PipelineOptions) -> MarkdownPipeline {
        MarkdownPipeline::with_syntaxes(Arc::clone(&SYNTAXES)).with_options(options)
    }

    fn plain() -> PipelineOptions {
        PipelineOptions {
            standalone: false,
            copy_button: false,
            heading_links: false,
            highlight: false,
        }
    }

    #[test]
    fn test_fragment_formatted() {
        let result = pipeline(plain()).render("## Section One\nSome text");
        assert_eq!(
            result.html,
            "<h2 id=\"section-one\">Section One</h2>\n<p>Some text</p>\n"
        );
    }

    #[test]
    fn test_default_options_add_self_links() {
        let result = pipeline(PipelineOptions::default()).render("## Intro");
        assert!(result.html.contains(r##"<a class="heading-anchor" href="#intro""##));
    }

    #[test]
    fn test_anchors_unique() {
        let result = pipeline(PipelineOptions::default())
            .render("## Overview\n\ntext\n\n## Overview\n\n### Overview\n");
        let entries: Vec<_> = toc::headings(&result.html).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].anchor, "overview");
        assert_eq!(entries[1].anchor, "overview-1");
        assert!(result.html.contains(r#"<h3 id="overview-2">"#));
    }

    #[test]
    fn test_unknown_language_degrades() {
        let result = pipeline(PipelineOptions::default())
            .render("Intro\n\n```klingon\nqapla' <batlh>\n```\n");
        assert!(result.html.contains("<p>Intro</p>"));
        assert!(result.html.contains("qapla&#x27; &lt;batlh&gt;"));
        assert!(result.html.contains(r#"<pre class="plain">"#));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_known_language_highlighted_with_copy_button() {
        let result = pipeline(PipelineOptions::default())
            .render("```python showLineNumbers\nprint('hi')\nx = 1\n```");
        assert!(result.html.contains(r#"<pre class="highlight">"#));
        assert!(result.html.contains("copy-button"));
        assert!(result.html.contains("<pre class=\"line-numbers\" aria-hidden=\"true\">1\n2</pre>"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_highlight_off_uses_plain_blocks() {
        let result = pipeline(plain()).render("```rust\nfn f() {}\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-rust\">fn f() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_prose_untouched_by_highlighter() {
        let with = pipeline(PipelineOptions {
            highlight: true,
            ..plain()
        })
        .render("Some *prose* here.");
        let without = pipeline(plain()).render("Some *prose* here.");
        assert_eq!(with.html, without.html);
    }

    #[test]
    fn test_standalone_wraps_with_title() {
        let result = pipeline(PipelineOptions {
            standalone: true,
            ..plain()
        })
        .render("# Hello\n\nBody");
        assert!(result.html.starts_with("<!DOCTYPE html>"));
        assert!(result.html.contains("<title>Hello</title>"));
        assert!(result.html.contains("<h1 id=\"hello\">Hello</h1>\n<p>Body</p>\n"));
        assert_eq!(result.title.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_standalone_untitled() {
        let result = pipeline(PipelineOptions {
            standalone: true,
            ..plain()
        })
        .render("Body");
        assert!(result.html.contains("<title>Untitled</title>"));
    }

    #[test]
    fn test_link_base() {
        let result = pipeline(plain())
            .with_link_base("/blog")
            .render("[next](next.md)");
        assert_eq!(result.html, "<p><a href=\"/blog/next\">next</a></p>\n");
    }

    #[test]
    fn test_empty_input() {
        let result = pipeline(PipelineOptions::default()).render("");
        assert_eq!(result.html, "");
        assert_eq!(toc::headings(&result.html).count(), 0);
    }
}
