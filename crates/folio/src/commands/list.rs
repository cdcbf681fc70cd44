//! `folio list` command implementation.

use clap::Args;
use folio_content::{ContentStore, FsContentStore};
use folio_site::{PostMeta, sort_newest_first};

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Print post metadata as JSON.
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    /// Execute the list command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.content.load(&self.content.cli_settings())?;
        let store = FsContentStore::new(&config.content_resolved.posts_dir);

        let mut posts: Vec<PostMeta> = store.scan()?.iter().map(PostMeta::from).collect();
        sort_newest_first(&mut posts);

        if self.json {
            output.print_line(&serde_json::to_string_pretty(&posts)?);
            return Ok(());
        }

        if posts.is_empty() {
            output.info(&format!("No posts in {}", store.dir().display()));
        }
        for row in format_rows(&posts) {
            output.print_line(&row);
        }
        Ok(())
    }
}

/// One aligned `slug  date  title` line per post.
fn format_rows(posts: &[PostMeta]) -> Vec<String> {
    let dates: Vec<String> = posts.iter().map(list_date).collect();
    let slug_width = posts.iter().map(|p| p.slug.chars().count()).max().unwrap_or(0);
    let date_width = dates.iter().map(|d| d.chars().count()).max().unwrap_or(0);

    posts
        .iter()
        .zip(&dates)
        .map(|(post, date)| {
            format!(
                "{:slug_width$}  {:date_width$}  {}",
                post.slug, date, post.title
            )
        })
        .collect()
}

/// ISO date when parsed, the display date otherwise.
fn list_date(post: &PostMeta) -> String {
    match (post.published, &post.date) {
        (Some(date), _) => date.to_string(),
        (None, Some(raw)) => raw.clone(),
        (None, None) => "-".to_owned(),
    }
}
