//! Render backend trait.
//!
//! The renderer walks the Markdown event stream and handles the structural
//! elements (lists, tables, inline formatting) itself. Elements whose markup
//! is a presentation choice go through a [`RenderBackend`].

use std::borrow::Cow;

use pulldown_cmark::BlockQuoteKind;

/// GitHub-style alert kind (`> [!NOTE]` and friends).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

/// Presentation hooks used by [`MarkdownRenderer`](crate::MarkdownRenderer).
pub trait RenderBackend {
    /// Render a code block no processor claimed.
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Open a heading element carrying its anchor id.
    fn heading_start(level: u8, id: &str, out: &mut String);

    /// Self-link placed inside a heading, after its content.
    fn heading_anchor(id: &str, text: &str, out: &mut String);

    /// Close a heading element.
    fn heading_end(level: u8, out: &mut String);

    fn blockquote_start(out: &mut String);

    fn blockquote_end(out: &mut String);

    fn alert_start(kind: AlertKind, out: &mut String);

    fn alert_end(kind: AlertKind, out: &mut String);

    /// Render an image once its alt text is known.
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    /// Rewrite a link target. Unchanged by default.
    #[must_use]
    fn transform_link<'a>(url: &'a str, _base_path: Option<&str>) -> Cow<'a, str> {
        Cow::Borrowed(url)
    }

    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }
}
