//! CLI command implementations.

pub(crate) mod list;
pub(crate) mod render;
pub(crate) mod serve;

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};

pub(crate) use list::ListArgs;
pub(crate) use render::RenderArgs;
pub(crate) use serve::ServeArgs;

use crate::error::CliError;

/// Options shared by commands that read content.
#[derive(Args, Debug)]
pub(crate) struct ContentArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Posts directory (overrides config).
    #[arg(long, env = "FOLIO_CONTENT_DIR")]
    content_dir: Option<PathBuf>,
}

impl ContentArgs {
    /// Overrides taken from these options.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            posts_dir: self.content_dir.clone(),
            ..CliSettings::default()
        }
    }

    fn load(&self, settings: &CliSettings) -> Result<Config, CliError> {
        let config = Config::load(self.config.as_deref(), Some(settings))?;
        tracing::debug!(config_path = ?config.config_path, "Loaded configuration");
        Ok(config)
    }
}
