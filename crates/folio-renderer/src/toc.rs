//! Table of contents from rendered HTML.
//!
//! Works on the serialized fragment rather than on renderer state, so any
//! HTML that carries `<h2 id="…">` headings can be scanned.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static H2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<h2\b([^>]*)>(.*?)</h2\s*>"#).unwrap()
});
static ID_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bid\s*=\s*"([^"]*)""#).unwrap());
static SELF_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\b[^>]*\bclass="heading-anchor"[^>]*>.*?</a>"#).unwrap()
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// One table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeadingEntry {
    /// Heading text without markup.
    pub text: String,
    /// Value of the heading's `id` attribute.
    pub anchor: String,
}

/// Lazy sequence of second-level headings in document order.
///
/// A clone resumes from the position it was cloned at. An anchor already
/// yielded is not yielded again, so entries stay unique even when raw HTML
/// headings reuse a generated id.
#[derive(Clone, Debug)]
pub struct Headings<'h> {
    html: &'h str,
    pos: usize,
    seen: HashSet<String>,
}

impl Iterator for Headings<'_> {
    type Item = HeadingEntry;

    fn next(&mut self) -> Option<HeadingEntry> {
        while self.pos <= self.html.len() {
            let caps = H2.captures_at(self.html, self.pos)?;
            let (Some(whole), Some(attrs), Some(inner)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                return None;
            };
            self.pos = whole.end();

            let Some(anchor) = ID_ATTR
                .captures(attrs.as_str())
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .filter(|a| !a.is_empty())
            else {
                continue;
            };
            let anchor = unescape(anchor);
            if !self.seen.insert(anchor.clone()) {
                continue;
            }
            return Some(HeadingEntry {
                text: heading_text(inner.as_str()),
                anchor,
            });
        }
        None
    }
}

/// Second-level headings of a rendered fragment.
///
/// H1 and H3-H6 are ignored, as are headings without an `id`.
#[must_use]
pub fn headings(html: &str) -> Headings<'_> {
    Headings {
        html,
        pos: 0,
        seen: HashSet::new(),
    }
}

/// Display text of a heading's inner HTML.
fn heading_text(inner: &str) -> String {
    let without_link = SELF_LINK.replace_all(inner, "");
    let plain = TAG.replace_all(&without_link, "");
    unescape(plain.trim())
}

/// Decode the entities produced by escaping plus numeric references.
fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_owned();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = rest
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(text: &str, anchor: &str) -> HeadingEntry {
        HeadingEntry {
            text: text.to_owned(),
            anchor: anchor.to_owned(),
        }
    }

    #[test]
    fn test_repeated_anchor_listed_once() {
        let html = r#"<h2 id="overview">Overview</h2><h2 id="overview-1">Raw</h2><h2 id="overview-1">Overview</h2>"#;
        let entries: Vec<_> = headings(html).collect();
        assert_eq!(
            entries,
            vec![entry("Overview", "overview"), entry("Raw", "overview-1")]
        );
    }

    #[test]
    fn test_only_h2_in_order() {
        let html = r#"<h1 id="t">Title</h1><h2 id="a">A</h2><h3 id="a1">A.1</h3><h2 id="b">B</h2>"#;
        let entries: Vec<_> = headings(html).collect();
        assert_eq!(entries, vec![entry("A", "a"), entry("B", "b")]);
    }

    #[test]
    fn test_no_headings_empty() {
        assert_eq!(headings("<p>Just text</p>").count(), 0);
        assert_eq!(headings("").count(), 0);
    }

    #[test]
    fn test_self_link_and_markup_stripped() {
        let html = r##"<h2 id="the-main-fn">The <code>main</code> fn<a class="heading-anchor" href="#the-main-fn" aria-label="Link to The main fn">#</a></h2>"##;
        assert_eq!(headings(html).next(), Some(entry("The main fn", "the-main-fn")));
    }

    #[test]
    fn test_entities_unescaped() {
        let html = r#"<h2 id="q-a">Q &amp; A &lt;3 &#x27;s &#65;</h2>"#;
        assert_eq!(headings(html).next().unwrap().text, "Q & A <3 's A");
    }

    #[test]
    fn test_heading_without_id_skipped() {
        let html = r#"<h2>No id</h2><h2 class="x" id="yes">Yes</h2>"#;
        let entries: Vec<_> = headings(html).collect();
        assert_eq!(entries, vec![entry("Yes", "yes")]);
    }

    #[test]
    fn test_restartable() {
        let html = r#"<h2 id="a">A</h2><h2 id="b">B</h2>"#;
        let mut iter = headings(html);
        let restart = iter.clone();

        assert_eq!(iter.next().unwrap().anchor, "a");
        assert_eq!(restart.count(), 2);
        assert_eq!(headings(html).count(), 2);
    }

    #[test]
    fn test_stray_ampersand_kept() {
        assert_eq!(unescape("a & b &unknown; c"), "a & b &unknown; c");
    }
}
