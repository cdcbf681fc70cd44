//! Pluggable handling of fenced code blocks.
//!
//! Every code block, with or without a language tag, is offered to the
//! registered processors in order. The first one returning
//! [`ProcessResult::Inline`] supplies the block's HTML; if none does, the
//! backend renders a plain `<pre><code>` block.

use std::collections::HashMap;

/// Outcome of offering a code block to a processor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the block with this HTML.
    Inline(String),
    /// Not handled; try the next processor.
    PassThrough,
}

/// Processor for fenced code blocks.
pub trait CodeBlockProcessor {
    /// Process one block.
    ///
    /// * `language` - first word of the fence info, empty when absent
    /// * `attrs` - remaining fence words; bare flags map to `"true"`
    /// * `source` - raw block content
    /// * `index` - zero-based position of the block in the document
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult;

    /// Non-fatal problems met while processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Split a fence info string into language and attributes.
///
/// Format: `language [flag | key=value ...]`. A `{...}` wrapper around the
/// attributes and a `,suffix` on the language (`rust,ignore`) are tolerated.
#[must_use]
pub(crate) fn parse_fence_info(info: &str) -> (String, HashMap<String, String>) {
    let mut parts = info
        .split(|c: char| c.is_whitespace() || c == '{' || c == '}')
        .filter(|part| !part.is_empty());

    let language = parts
        .next()
        .and_then(|first| first.split(',').next())
        .unwrap_or_default()
        .to_owned();

    let attrs = parts
        .map(|part| match part.split_once('=') {
            Some((key, value)) => (
                key.to_owned(),
                value.trim_matches(|c| c == '"' || c == '\'').to_owned(),
            ),
            None => (part.to_owned(), "true".to_owned()),
        })
        .collect();

    (language, attrs)
}

/// Whether a boolean fence flag is set under any of `names`.
pub(crate) fn flag_enabled(attrs: &HashMap<String, String>, names: &[&str]) -> bool {
    names
        .iter()
        .filter_map(|name| attrs.get(*name))
        .any(|value| !matches!(value.as_str(), "false" | "0" | "no"))
}
