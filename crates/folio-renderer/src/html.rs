//! HTML5 backend.

use std::borrow::Cow;
use std::fmt::Write;

use crate::backend::{AlertKind, RenderBackend};
use crate::state::escape_html;

/// HTML render backend.
///
/// Headings carry `id` attributes and an optional `heading-anchor` self-link.
/// Relative links to sibling `.md` files are rewritten to post URLs under the
/// configured base path.
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        match lang {
            Some(lang) => write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap(),
            None => write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap(),
        }
    }

    fn heading_start(level: u8, id: &str, out: &mut String) {
        write!(out, r#"<h{level} id="{}">"#, escape_html(id)).unwrap();
    }

    fn heading_anchor(id: &str, text: &str, out: &mut String) {
        write!(
            out,
            r##"<a class="heading-anchor" href="#{}" aria-label="Link to {}">#</a>"##,
            escape_html(id),
            escape_html(text.trim())
        )
        .unwrap();
    }

    fn heading_end(level: u8, out: &mut String) {
        write!(out, "</h{level}>").unwrap();
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn alert_start(kind: AlertKind, out: &mut String) {
        let (class, title) = match kind {
            AlertKind::Note => ("note", "Note"),
            AlertKind::Tip => ("tip", "Tip"),
            AlertKind::Important => ("important", "Important"),
            AlertKind::Warning => ("warning", "Warning"),
            AlertKind::Caution => ("caution", "Caution"),
        };
        write!(
            out,
            r#"<div class="alert alert-{class}" role="note"><p class="alert-title">{title}</p>"#
        )
        .unwrap();
    }

    fn alert_end(_kind: AlertKind, out: &mut String) {
        out.push_str("</div>");
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        out.push_str("<img src=\"");
        out.push_str(&escape_html(src));
        out.push_str("\" alt=\"");
        out.push_str(&escape_html(alt));
        out.push('"');
        if !title.is_empty() {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        out.push_str(r#" loading="lazy">"#);
    }

    fn transform_link<'a>(url: &'a str, base_path: Option<&str>) -> Cow<'a, str> {
        match base_path {
            Some(base) => resolve_link(url, base),
            None => Cow::Borrowed(url),
        }
    }
}

/// Rewrite a link to another content file into its post URL.
///
/// - `other-post.md` → `/blog/other-post`
/// - `./drafts/idea.md#intro` → `/blog/idea#intro`
///
/// Posts live in one flat namespace, so only the file stem is kept.
/// External, absolute, fragment-only and non-Markdown links are unchanged.
fn resolve_link<'a>(url: &'a str, base_path: &str) -> Cow<'a, str> {
    if url.contains("://") || url.starts_with("//") || url.starts_with('/') {
        return Cow::Borrowed(url);
    }

    let (path, fragment) = match url.find('#') {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    };
    let Some(stem) = path
        .strip_suffix(".md")
        .or_else(|| path.strip_suffix(".markdown"))
    else {
        return Cow::Borrowed(url);
    };

    let stem = stem.rsplit('/').next().unwrap_or(stem);
    if stem.is_empty() {
        return Cow::Borrowed(url);
    }

    let base = base_path.trim_end_matches('/');
    Cow::Owned(format!("{base}/{stem}{fragment}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("rust"), "fn main() {}", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_escapes_content() {
        let mut out = String::new();
        HtmlBackend::code_block(None, "<b>&</b>", &mut out);
        assert_eq!(out, "<pre><code>&lt;b&gt;&amp;&lt;/b&gt;</code></pre>");
    }

    #[test]
    fn test_heading_with_anchor() {
        let mut out = String::new();
        HtmlBackend::heading_start(2, "intro", &mut out);
        out.push_str("Intro");
        HtmlBackend::heading_anchor("intro", "Intro", &mut out);
        HtmlBackend::heading_end(2, &mut out);
        assert_eq!(
            out,
            r##"<h2 id="intro">Intro<a class="heading-anchor" href="#intro" aria-label="Link to Intro">#</a></h2>"##
        );
    }

    #[test]
    fn test_alert() {
        let mut out = String::new();
        HtmlBackend::alert_start(AlertKind::Warning, &mut out);
        out.push_str("<p>Careful</p>");
        HtmlBackend::alert_end(AlertKind::Warning, &mut out);
        assert_eq!(
            out,
            r#"<div class="alert alert-warning" role="note"><p class="alert-title">Warning</p><p>Careful</p></div>"#
        );
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        HtmlBackend::image("/a.png", "An \"a\"", "Title", &mut out);
        assert_eq!(
            out,
            r#"<img src="/a.png" alt="An &quot;a&quot;" title="Title" loading="lazy">"#
        );
    }

    #[test]
    fn test_resolve_sibling_post() {
        assert_eq!(resolve_link("other-post.md", "/blog"), "/blog/other-post");
        assert_eq!(resolve_link("./other.md#intro", "/blog/"), "/blog/other#intro");
        assert_eq!(resolve_link("../drafts/idea.markdown", "/blog"), "/blog/idea");
    }

    #[test]
    fn test_resolve_leaves_other_links() {
        assert_eq!(resolve_link("https://example.com/a.md", "/blog"), "https://example.com/a.md");
        assert_eq!(resolve_link("/about", "/blog"), "/about");
        assert_eq!(resolve_link("#section", "/blog"), "#section");
        assert_eq!(resolve_link("image.png", "/blog"), "image.png");
        assert_eq!(resolve_link("mailto:me@example.com", "/blog"), "mailto:me@example.com");
    }

    #[test]
    fn test_transform_link_without_base() {
        assert_eq!(HtmlBackend::transform_link("post.md", None), "post.md");
    }
}
