//! Posts API.
//!
//! JSON views of the same rendering the HTML pages use.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use folio_renderer::HeadingEntry;
use folio_site::PostMeta;
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/posts/{slug}.
#[derive(Serialize)]
struct PostResponse<'a> {
    meta: &'a PostMeta,
    toc: &'a [HeadingEntry],
    /// Rendered article body, without page chrome.
    content: &'a str,
}

/// Handle GET /api/posts.
pub(crate) async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostMeta>>, ServerError> {
    Ok(Json(state.site.posts()?))
}

/// Handle GET /api/posts/{slug}.
pub(crate) async fn get_post(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let page = state.site.render(&slug)?;

    let etag = compute_etag(&state.version, &page.html);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let response = PostResponse {
        meta: &page.meta,
        toc: &page.toc,
        content: &page.content,
    };

    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// `ETag` over version and composed page: MD5 truncated to 16 hex chars.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
