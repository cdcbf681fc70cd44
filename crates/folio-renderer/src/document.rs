//! Post-conversion stages: standalone wrapping and whitespace formatting.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::state::escape_html;

/// `<pre>` elements, whose content must survive formatting byte for byte.
static PRE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<pre\b.*?</pre>").unwrap());

/// Block-level closing tags (plus void `<hr>`), with any newline already after them.
static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(</(?:p|h[1-6]|ul|ol|li|dl|dt|dd|blockquote|table|thead|tbody|tr|div|section|article|aside|nav|header|footer)>|<hr>)\n?",
    )
    .unwrap()
});

/// Wrap a fragment in a minimal HTML document.
#[must_use]
pub fn wrap_document(fragment: &str, title: &str) -> String {
    let mut out = String::with_capacity(fragment.len() + 160);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    writeln!(out, "<title>{}</title>", escape_html(title)).unwrap();
    out.push_str("</head>\n<body>\n");
    out.push_str(fragment);
    if !fragment.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// Put each block-level element on its own line.
///
/// A newline follows every block closing tag outside `<pre>`. Content
/// inside `<pre>` is never changed.
#[must_use]
pub fn format_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + html.len() / 16);
    let mut last = 0;

    for pre in PRE_BLOCK.find_iter(html) {
        out.push_str(&BLOCK_END.replace_all(&html[last..pre.start()], "$1\n"));
        out.push_str(pre.as_str());
        last = pre.end();
    }
    out.push_str(&BLOCK_END.replace_all(&html[last..], "$1\n"));

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_format_inserts_newlines() {
        assert_eq!(
            format_html("<h2 id=\"a\">A</h2><p>x</p><ul><li>1</li></ul>"),
            "<h2 id=\"a\">A</h2>\n<p>x</p>\n<ul><li>1</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_format_is_idempotent() {
        let once = format_html("<p>a</p><hr><p>b</p>");
        assert_eq!(once, "<p>a</p>\n<hr>\n<p>b</p>\n");
        assert_eq!(format_html(&once), once);
    }

    #[test]
    fn test_format_leaves_pre_untouched() {
        let html = "<div class=\"code-block\"><pre><code>&lt;/p&gt;</p></div>\n\n</code></pre></div>";
        assert_eq!(
            format_html(html),
            "<div class=\"code-block\"><pre><code>&lt;/p&gt;</p></div>\n\n</code></pre></div>\n"
        );
    }

    #[test]
    fn test_format_inline_untouched() {
        assert_eq!(format_html("<em>a</em><code>b</code>"), "<em>a</em><code>b</code>");
    }

    #[test]
    fn test_wrap_document() {
        let doc = wrap_document("<p>Hi</p>\n", "A & B");
        assert!(doc.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(doc.contains("<title>A &amp; B</title>"));
        assert!(doc.contains("<body>\n<p>Hi</p>\n</body>"));
        assert!(doc.ends_with("</html>\n"));
    }
}
