//! `folio render` command implementation.

use clap::Args;
use folio_content::{ContentStore, Document, FsContentStore};
use folio_renderer::{MarkdownPipeline, PipelineOptions, RenderResult, format_html, wrap_document};

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Slug of the post to render.
    slug: String,

    #[command(flatten)]
    content: ContentArgs,

    /// Wrap the output in a complete HTML document.
    #[arg(long)]
    standalone: bool,

    /// Print the post's front matter as YAML before the HTML.
    #[arg(long)]
    front_matter: bool,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.content.load(&self.content.cli_settings())?;
        let store = FsContentStore::new(&config.content_resolved.posts_dir);
        let document = store.get(&self.slug)?;

        let pipeline = MarkdownPipeline::new()
            .with_options(PipelineOptions {
                standalone: false,
                copy_button: config.render.copy_button,
                heading_links: config.render.heading_links,
                highlight: true,
            })
            .with_link_base("/blog");
        let result = pipeline.render(document.body());
        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        output.print(&self.compose(&document, result)?);
        Ok(())
    }

    /// Text printed for one rendered document.
    fn compose(&self, document: &Document, result: RenderResult) -> Result<String, CliError> {
        let mut text = String::new();

        if self.front_matter {
            text.push_str("---\n");
            text.push_str(&document.front_matter().to_yaml()?);
            text.push_str("---\n");
        }

        if self.standalone {
            let title = result.title.as_deref().unwrap_or(&document.title);
            text.push_str(&format_html(&wrap_document(&result.html, title)));
        } else {
            text.push_str(&result.html);
        }

        Ok(text)
    }
}
