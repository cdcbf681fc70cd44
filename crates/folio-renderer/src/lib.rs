//! Markdown rendering for Folio.
//!
//! [`MarkdownPipeline`] turns a Markdown body into an HTML fragment through a
//! fixed chain: parse, convert (heading ids, self-links, highlighted code
//! blocks), optional standalone wrapping, then whitespace formatting.
//! [`toc::headings`] recovers the second-level headings from the result.
//!
//! # Example
//!
//! ```
//! use folio_renderer::{MarkdownPipeline, toc};
//!
//! let pipeline = MarkdownPipeline::new();
//! let result = pipeline.render("## Section One\n\nSome text");
//!
//! let entries: Vec<_> = toc::headings(&result.html).collect();
//! assert_eq!(entries[0].text, "Section One");
//! assert_eq!(entries[0].anchor, "section-one");
//! ```

mod backend;
mod code_block;
mod document;
mod highlight;
mod html;
mod pipeline;
mod renderer;
mod state;
pub mod toc;

pub use backend::{AlertKind, RenderBackend};
pub use code_block::{CodeBlockProcessor, ProcessResult};
pub use document::{format_html, wrap_document};
pub use highlight::{CLASS_STYLE, SyntaxHighlighter, theme_css};
pub use html::HtmlBackend;
pub use pipeline::{MarkdownPipeline, PipelineOptions};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{escape_html, slugify};
pub use toc::HeadingEntry;
