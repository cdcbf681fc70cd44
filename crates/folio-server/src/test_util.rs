//! Router fixtures shared by handler tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use folio_content::{ContentStore, MockContentStore};
use folio_mail::{ContactMessage, MailError, Mailer};
use folio_site::{Site, SiteConfig};
use tower::ServiceExt;

use crate::app::create_router;
use crate::state::AppState;

pub(crate) const HELLO: &str =
    "---\ntitle: \"Hello\"\nslug: \"hello\"\ndate: 2024-01-05\n---\n## Section One\nSome text";

/// Mailer that counts accepted messages.
#[derive(Default)]
pub(crate) struct StubMailer {
    sent: AtomicUsize,
}

impl StubMailer {
    pub(crate) fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

impl Mailer for StubMailer {
    fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        message.validate()?;
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Router over a posts store holding `hello.md`.
pub(crate) fn app(mailer: Option<Arc<dyn Mailer>>) -> Router {
    app_with(MockContentStore::new().with_file("hello.md", HELLO), mailer)
}

pub(crate) fn app_with(posts: MockContentStore, mailer: Option<Arc<dyn Mailer>>) -> Router {
    let posts: Arc<dyn ContentStore> = Arc::new(posts);
    let pages: Arc<dyn ContentStore> = Arc::new(MockContentStore::new());
    let state = Arc::new(AppState {
        site: Arc::new(Site::new(posts, pages, SiteConfig::default())),
        mailer,
        version: "test".to_owned(),
    });
    create_router(state)
}

/// Run one request, returning status, headers and body text.
pub(crate) async fn send(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}
