//! Application state.

use std::sync::Arc;

use folio_mail::Mailer;
use folio_site::Site;

/// State shared by all handlers.
pub(crate) struct AppState {
    pub(crate) site: Arc<Site>,
    /// Contact form delivery, when configured.
    pub(crate) mailer: Option<Arc<dyn Mailer>>,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}
