//! HTML pages.
//!
//! A missing post renders the not-found page with status 404. Store
//! failures are logged and answered with a bare 500 page.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use folio_site::RenderError;

use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn home(State(state): State<Arc<AppState>>) -> Response {
    page_response(&state, "/", state.site.home())
}

/// Handle GET /blog.
pub(crate) async fn blog_index(State(state): State<Arc<AppState>>) -> Response {
    page_response(&state, "/blog", state.site.blog_index())
}

/// Handle GET /blog/{slug}.
pub(crate) async fn blog_post(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state.site.render(&slug).map(|page| page.html);
    page_response(&state, &format!("/blog/{slug}"), result)
}

/// Handle GET /about.
pub(crate) async fn about(State(state): State<Arc<AppState>>) -> Response {
    page_response(&state, "/about", state.site.about())
}

/// Fallback for unknown paths.
pub(crate) async fn not_found(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    (StatusCode::NOT_FOUND, Html(state.site.not_found(uri.path()))).into_response()
}

fn page_response(state: &AppState, path: &str, result: Result<String, RenderError>) -> Response {
    match result {
        Ok(html) => Html(html).into_response(),
        Err(RenderError::NotFound(slug)) => {
            tracing::debug!(%slug, "Post not found");
            (StatusCode::NOT_FOUND, Html(state.site.not_found(path))).into_response()
        }
        Err(e) => {
            tracing::error!(%path, error = %e, "Page render failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<!DOCTYPE html>\n<title>Error</title>\n<h1>Something went wrong</h1>\n"),
            )
                .into_response()
        }
    }
}
