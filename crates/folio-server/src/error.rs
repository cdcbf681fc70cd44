//! Error types for the JSON API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_site::RenderError;
use serde_json::json;

/// API error, rendered as a JSON body.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Render error: {0}")]
    Render(RenderError),

    /// A blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<RenderError> for ServerError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::NotFound(slug) => Self::PostNotFound(slug),
            other => Self::Render(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PostNotFound(slug) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Post not found", "slug": slug}),
            ),
            Self::Render(e) => {
                tracing::error!(error = %e, "Render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
            Self::Task(e) => {
                tracing::error!(error = %e, "Background task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
