//! Contact form endpoints.
//!
//! The mail call blocks, so it runs on the blocking pool. Visitors only
//! learn whether the message went out; the cause of a failure is logged.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use folio_mail::{ContactMessage, ContactOutcome};
use serde_json::json;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /contact.
pub(crate) async fn contact_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.site.contact(None))
}

/// Handle POST /contact (HTML form).
///
/// Re-renders the form with a success or failure banner.
pub(crate) async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(message): Form<ContactMessage>,
) -> Result<Html<String>, ServerError> {
    let outcome = deliver(&state, message).await?;
    Ok(Html(state.site.contact(Some(outcome))))
}

/// Handle POST /api/contact.
///
/// `400` for invalid input, `200 {"status":"sent"}` on delivery and
/// `502 {"status":"failed"}` otherwise.
pub(crate) async fn submit_api(
    State(state): State<Arc<AppState>>,
    Json(message): Json<ContactMessage>,
) -> Result<Response, ServerError> {
    let message = message.trimmed();
    if let Err(e) = message.validate() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "invalid", "error": e.to_string()})),
        )
            .into_response());
    }

    let outcome = deliver(&state, message).await?;
    let status = match outcome {
        ContactOutcome::Sent => StatusCode::OK,
        ContactOutcome::Failed => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(json!({"status": outcome.as_str()}))).into_response())
}

async fn deliver(
    state: &AppState,
    message: ContactMessage,
) -> Result<ContactOutcome, ServerError> {
    let Some(mailer) = state.mailer.clone() else {
        tracing::warn!("Contact message dropped, no mail service configured");
        return Ok(ContactOutcome::Failed);
    };

    let outcome =
        tokio::task::spawn_blocking(move || folio_mail::submit(mailer.as_ref(), &message)).await?;
    Ok(outcome)
}
