//! Syntax highlighting for fenced code blocks.
//!
//! Highlighting emits `hl-` prefixed CSS classes rather than inline colours,
//! so the palette comes from a stylesheet ([`theme_css`]) and can follow the
//! site's light/dark toggle.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::code_block::{CodeBlockProcessor, ProcessResult, flag_enabled};
use crate::state::escape_html;

/// Class naming used for highlighted spans.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Fence flags requesting a line-number gutter.
const LINE_NUMBER_FLAGS: &[&str] = &["showLineNumbers", "linenos", "line-numbers"];

/// Code block processor that highlights every fenced block.
///
/// Blocks in a language the syntax set does not know, and blocks without a
/// language, are rendered as escaped plain text inside the same wrapper. An
/// unknown language also records a warning.
pub struct SyntaxHighlighter {
    syntaxes: Arc<SyntaxSet>,
    copy_button: bool,
    warnings: Vec<String>,
}

impl SyntaxHighlighter {
    #[must_use]
    pub fn new(syntaxes: Arc<SyntaxSet>) -> Self {
        Self {
            syntaxes,
            copy_button: false,
            warnings: Vec::new(),
        }
    }

    /// Add a "Copy" button to every block.
    #[must_use]
    pub fn with_copy_button(mut self, enabled: bool) -> Self {
        self.copy_button = enabled;
        self
    }

    /// Highlighted HTML, or `None` when the language is unknown.
    fn highlight(&self, language: &str, source: &str) -> Result<Option<String>, syntect::Error> {
        let Some(syntax) = self.syntaxes.find_syntax_by_token(language) else {
            return Ok(None);
        };

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(source) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(Some(generator.finalize()))
    }

    fn wrap(
        &self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        code: &str,
        highlighted: bool,
    ) -> String {
        let mut out = String::with_capacity(code.len() + 256);

        out.push_str(r#"<div class="code-block""#);
        if !language.is_empty() {
            write!(out, r#" data-lang="{}""#, escape_html(language)).unwrap();
        }
        out.push('>');

        if let Some(title) = attrs.get("title") {
            write!(out, r#"<div class="code-title">{}</div>"#, escape_html(title)).unwrap();
        }
        if self.copy_button {
            out.push_str(
                r#"<button type="button" class="copy-button" aria-label="Copy code">Copy</button>"#,
            );
        }
        if flag_enabled(attrs, LINE_NUMBER_FLAGS) {
            out.push_str(r#"<pre class="line-numbers" aria-hidden="true">"#);
            for n in 1..=source.lines().count().max(1) {
                if n > 1 {
                    out.push('\n');
                }
                write!(out, "{n}").unwrap();
            }
            out.push_str("</pre>");
        }

        let pre_class = if highlighted { "highlight" } else { "plain" };
        write!(out, r#"<pre class="{pre_class}"><code"#).unwrap();
        if !language.is_empty() {
            write!(out, r#" class="language-{}""#, escape_html(language)).unwrap();
        }
        write!(out, ">{code}</code></pre></div>").unwrap();

        out
    }
}

impl CodeBlockProcessor for SyntaxHighlighter {
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult {
        let highlighted = if language.is_empty() {
            None
        } else {
            match self.highlight(language, source) {
                Ok(Some(html)) => Some(html),
                Ok(None) => {
                    self.warnings.push(format!(
                        "Code block {index}: unknown language '{language}', rendered as plain text"
                    ));
                    None
                }
                Err(e) => {
                    self.warnings.push(format!(
                        "Code block {index}: highlighting '{language}' failed ({e}), rendered as plain text"
                    ));
                    None
                }
            }
        };

        let html = match highlighted {
            Some(code) => self.wrap(language, attrs, source, &code, true),
            None => self.wrap(language, attrs, source, &escape_html(source), false),
        };
        ProcessResult::Inline(html)
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Stylesheet for one of syntect's bundled themes, using [`CLASS_STYLE`].
///
/// Returns `None` for an unknown theme name.
#[must_use]
pub fn theme_css(theme: &str) -> Option<String> {
    let themes = ThemeSet::load_defaults();
    let theme = themes.themes.get(theme)?;
    css_for_theme_with_class_style(theme, CLASS_STYLE)
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to build highlight stylesheet"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighter() -> SyntaxHighlighter {
        SyntaxHighlighter::new(Arc::new(SyntaxSet::load_defaults_newlines()))
    }

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn inline(result: ProcessResult) -> String {
        match result {
            ProcessResult::Inline(html) => html,
            ProcessResult::PassThrough => panic!("expected inline html"),
        }
    }

    #[test]
    fn test_known_language_highlighted() {
        let mut hl = highlighter();
        let html = inline(hl.process("rust", &HashMap::new(), "fn main() {}\n", 0));

        assert!(html.starts_with(r#"<div class="code-block" data-lang="rust">"#));
        assert!(html.contains(r#"<pre class="highlight"><code class="language-rust">"#));
        assert!(html.contains(r#"<span class="hl-"#));
        assert!(html.ends_with("</code></pre></div>"));
        assert!(hl.warnings().is_empty());
    }

    #[test]
    fn test_unknown_language_plain_text() {
        let mut hl = highlighter();
        let html = inline(hl.process("nosuchlang", &HashMap::new(), "a < b\n", 3));

        assert!(html.contains(r#"<pre class="plain"><code class="language-nosuchlang">a &lt; b"#));
        assert!(!html.contains("<span"));
        assert_eq!(hl.warnings().len(), 1);
        assert!(hl.warnings()[0].contains("nosuchlang"));
        assert!(hl.warnings()[0].starts_with("Code block 3"));
    }

    #[test]
    fn test_no_language_plain_without_warning() {
        let mut hl = highlighter();
        let html = inline(hl.process("", &HashMap::new(), "just text\n", 0));

        assert_eq!(
            html,
            "<div class=\"code-block\"><pre class=\"plain\"><code>just text\n</code></pre></div>"
        );
        assert!(hl.warnings().is_empty());
    }

    #[test]
    fn test_line_number_gutter() {
        let mut hl = highlighter();
        let source = "one\ntwo\nthree\n";
        let html = inline(hl.process("", &attrs(&[("showLineNumbers", "true")]), source, 0));

        assert!(html.contains("<pre class=\"line-numbers\" aria-hidden=\"true\">1\n2\n3</pre>"));
    }

    #[test]
    fn test_line_numbers_disabled_by_value() {
        let mut hl = highlighter();
        let html = inline(hl.process("", &attrs(&[("linenos", "false")]), "x\n", 0));

        assert!(!html.contains("line-numbers"));
    }

    #[test]
    fn test_copy_button_and_title() {
        let mut hl = highlighter().with_copy_button(true);
        let html = inline(hl.process("toml", &attrs(&[("title", "Cargo.toml")]), "a = 1\n", 0));

        assert!(html.contains(r#"<div class="code-title">Cargo.toml</div>"#));
        assert!(html.contains(r#"<button type="button" class="copy-button" aria-label="Copy code">Copy</button>"#));
    }

    #[test]
    fn test_no_copy_button_by_default() {
        let mut hl = highlighter();
        let html = inline(hl.process("", &HashMap::new(), "x\n", 0));

        assert!(!html.contains("copy-button"));
    }

    #[test]
    fn test_theme_css() {
        let css = theme_css("InspiredGitHub").unwrap();
        assert!(css.contains(".hl-"));
        assert!(theme_css("No Such Theme").is_none());
    }
}
