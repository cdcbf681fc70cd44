//! HTTP server for Folio.
//!
//! Serves the blog and portfolio pages as HTML, a small JSON API over the
//! same rendering, the contact form endpoints and the static assets the
//! pages reference.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use folio_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         posts_dir: PathBuf::from("posts"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (folio-server)
//!                        │
//!                        ├─► HTML pages ──► Site (store + pipeline + chrome)
//!                        │
//!                        ├─► JSON API   ──► Site
//!                        │
//!                        ├─► Contact    ──► Mailer (blocking pool)
//!                        │
//!                        └─► Assets (stylesheets, highlight themes, script)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
#[cfg(test)]
mod test_util;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use folio_content::{ContentStore, FsContentStore};
use folio_mail::{HttpMailer, Mailer, MailerConfig};
use folio_site::{Site, SiteConfig};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory of blog posts.
    pub posts_dir: PathBuf,
    /// Directory of standalone pages.
    pub pages_dir: PathBuf,
    /// Site identity and rendering switches.
    pub site: SiteConfig,
    /// Mail service for the contact form (`None` makes every submission fail).
    pub contact: Option<MailerConfig>,
    /// Application version, part of every `ETag`.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            posts_dir: PathBuf::from("posts"),
            pages_dir: PathBuf::from("pages"),
            site: SiteConfig::default(),
            contact: None,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let posts: Arc<dyn ContentStore> = Arc::new(FsContentStore::new(config.posts_dir.clone()));
    let pages: Arc<dyn ContentStore> = Arc::new(FsContentStore::new(config.pages_dir.clone()));
    let site = Arc::new(Site::new(posts, pages, config.site.clone()));

    let mailer = config.contact.clone().map(|contact| {
        tracing::info!(endpoint = %contact.endpoint, "Contact form enabled");
        Arc::new(HttpMailer::new(contact)) as Arc<dyn Mailer>
    });
    if mailer.is_none() {
        tracing::warn!("No [contact] configuration, contact form submissions will fail");
    }

    let state = Arc::new(AppState {
        site,
        mailer,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        posts_dir = %config.posts_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from a loaded `folio.toml`.
#[must_use]
pub fn server_config_from_folio_config(config: &folio_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        posts_dir: config.content_resolved.posts_dir.clone(),
        pages_dir: config.content_resolved.pages_dir.clone(),
        site: SiteConfig {
            title: config.site.title.clone(),
            description: config.site.description.clone(),
            author: config.site.author.clone(),
            recent_posts: config.site.recent_posts,
            copy_button: config.render.copy_button,
            heading_links: config.render.heading_links,
        },
        contact: config.contact.as_ref().map(|contact| MailerConfig {
            endpoint: contact.endpoint.clone(),
            service_id: contact.service_id.clone(),
            template_id: contact.template_id.clone(),
            public_key: contact.public_key.clone(),
            private_key: contact.private_key.clone(),
        }),
        version,
    }
}
