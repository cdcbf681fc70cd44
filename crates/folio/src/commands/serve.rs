//! `folio serve` command implementation.

use clap::Args;
use folio_server::{run_server, server_config_from_folio_config};

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args, Debug)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request traces and render timing).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let mut settings = self.content.cli_settings();
        settings.host = self.host;
        settings.port = self.port;
        let config = self.content.load(&settings)?;

        output.highlight(&format!(
            "Starting server on http://{}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Posts directory: {}",
            config.content_resolved.posts_dir.display()
        ));
        output.info(&format!(
            "Pages directory: {}",
            config.content_resolved.pages_dir.display()
        ));
        match config.contact()? {
            Some(contact) => output.info(&format!("Contact form: {}", contact.endpoint)),
            None => output.info("Contact form: disabled (no [contact] in config)"),
        }

        let server_config = server_config_from_folio_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
