//! Static assets referenced by the page chrome.
//!
//! The stylesheet and script are compiled in. Highlight stylesheets are
//! generated once from syntect's bundled themes.

use std::sync::LazyLock;

use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use folio_renderer::theme_css;

const SITE_CSS: &str = include_str!("../../assets/site.css");
const SITE_JS: &str = include_str!("../../assets/site.js");

const LIGHT_THEME: &str = "InspiredGitHub";
const DARK_THEME: &str = "base16-ocean.dark";

const CSS: &str = "text/css; charset=utf-8";
const JS: &str = "text/javascript; charset=utf-8";

static HIGHLIGHT_LIGHT: LazyLock<String> = LazyLock::new(|| highlight_css(LIGHT_THEME));
static HIGHLIGHT_DARK: LazyLock<String> = LazyLock::new(|| highlight_css(DARK_THEME));

fn highlight_css(theme: &str) -> String {
    theme_css(theme).unwrap_or_else(|| {
        tracing::warn!(theme, "Highlight theme unavailable, serving empty stylesheet");
        String::new()
    })
}

/// Handle GET /assets/{file}.
pub(crate) async fn get_asset(Path(file): Path<String>) -> Response {
    let (content, mime): (&str, &str) = match file.as_str() {
        "site.css" => (SITE_CSS, CSS),
        "site.js" => (SITE_JS, JS),
        "highlight-light.css" => (HIGHLIGHT_LIGHT.as_str(), CSS),
        "highlight-dark.css" => (HIGHLIGHT_DARK.as_str(), CSS),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    (
        [
            (header::CONTENT_TYPE, mime),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        content.to_owned(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_exist() {
        assert!(HIGHLIGHT_LIGHT.contains(".hl-"));
        assert!(HIGHLIGHT_DARK.contains(".hl-"));
    }

    #[test]
    fn test_script_handles_toggle_and_copy() {
        assert!(SITE_JS.contains("theme-toggle"));
        assert!(SITE_JS.contains("copy-button"));
    }
}
