//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{assets, contact, pages, posts};
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let page_routes = Router::new()
        .route("/", get(pages::home))
        .route("/blog", get(pages::blog_index))
        .route("/blog/{slug}", get(pages::blog_post))
        .route("/about", get(pages::about))
        .route(
            "/contact",
            get(contact::contact_page).post(contact::submit_form),
        );

    let api_routes = Router::new()
        .route("/api/posts", get(posts::list_posts))
        .route("/api/posts/{slug}", get(posts::get_post))
        .route("/api/contact", post(contact::submit_api));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .route("/assets/{file}", get(assets::get_asset))
        .fallback(pages::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
