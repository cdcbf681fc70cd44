//! Configuration management for Folio.
//!
//! Parses `folio.toml` with serde and finds it in the current directory or
//! any parent. Command-line overrides are applied on load via
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! These fields accept `${VAR}` and `${VAR:-default}`:
//! - `server.host`
//! - `contact.endpoint`
//! - `contact.service_id`
//! - `contact.template_id`
//! - `contact.public_key`
//! - `contact.private_key`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Overrides taken from the command line.
///
/// Only `Some` fields replace loaded values.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Override the posts directory.
    pub posts_dir: Option<PathBuf>,
    /// Override the pages directory.
    pub pages_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Default mail endpoint (EmailJS REST API).
pub const DEFAULT_CONTACT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    /// Content locations as written in TOML.
    content: ContentConfigRaw,
    pub render: RenderConfig,
    /// Mail delivery for the contact form. Without it the form reports
    /// failure for every submission.
    pub contact: Option<ContactConfig>,

    /// Content locations resolved against the config directory.
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Site identity shown in page chrome.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub author: Option<String>,
    /// Number of posts shown on the home page.
    pub recent_posts: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_owned(),
            description: "Notes, projects and writing.".to_owned(),
            author: None,
            recent_posts: 3,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    posts_dir: Option<String>,
    pages_dir: Option<String>,
}

/// Content directories with paths resolved.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory holding blog posts.
    pub posts_dir: PathBuf,
    /// Directory holding standalone pages such as `about.md`.
    pub pages_dir: PathBuf,
}

/// Markdown rendering switches.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Add a copy button to code blocks.
    pub copy_button: bool,
    /// Add a self-link to every heading.
    pub heading_links: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            copy_button: true,
            heading_links: true,
        }
    }
}

/// Mail service credentials for the contact form.
#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_contact_endpoint")]
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    /// Optional access token for server-side sends.
    pub private_key: Option<String>,
}

impl ContactConfig {
    /// Validate that all required fields are set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.endpoint, "contact.endpoint")?;
        require_http_url(&self.endpoint, "contact.endpoint")?;
        require_non_empty(&self.service_id, "contact.service_id")?;
        require_non_empty(&self.template_id, "contact.template_id")?;
        require_non_empty(&self.public_key, "contact.public_key")?;
        Ok(())
    }
}

fn default_contact_endpoint() -> String {
    DEFAULT_CONTACT_ENDPOINT.to_owned()
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// A `${VAR}` reference without a value.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Dotted field path, e.g. `contact.public_key`.
        field: String,
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration and apply CLI overrides.
    ///
    /// With `config_path`, that file must exist. Otherwise `folio.toml` is
    /// searched for from the current directory upwards, and defaults rooted
    /// at the current directory are used when none is found.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(posts_dir) = &settings.posts_dir {
            self.content_resolved.posts_dir.clone_from(posts_dir);
        }
        if let Some(pages_dir) = &settings.pages_dir {
            self.content_resolved.pages_dir.clone_from(pages_dir);
        }
    }

    /// Validated contact configuration, if the section is present.
    pub fn contact(&self) -> Result<Option<&ContactConfig>, ConfigError> {
        match &self.contact {
            Some(contact) => {
                contact.validate()?;
                Ok(Some(contact))
            }
            None => Ok(None),
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Default config with content directories under `base`.
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            content: ContentConfigRaw::default(),
            render: RenderConfig::default(),
            contact: None,
            content_resolved: ContentConfig {
                posts_dir: base.join("posts"),
                pages_dir: base.join("pages"),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Check value constraints. Runs after every load.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        if self.site.recent_posts == 0 {
            return Err(ConfigError::Validation(
                "site.recent_posts must be at least 1".to_owned(),
            ));
        }
        if let Some(contact) = &self.contact {
            contact.validate()?;
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(contact) = &mut self.contact {
            contact.endpoint = expand::expand_env(&contact.endpoint, "contact.endpoint")?;
            contact.service_id = expand::expand_env(&contact.service_id, "contact.service_id")?;
            contact.template_id =
                expand::expand_env(&contact.template_id, "contact.template_id")?;
            contact.public_key = expand::expand_env(&contact.public_key, "contact.public_key")?;
            if let Some(key) = &contact.private_key {
                contact.private_key = Some(expand::expand_env(key, "contact.private_key")?);
            }
        }

        Ok(())
    }

    /// Resolve content directories against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content_resolved = ContentConfig {
            posts_dir: resolve(self.content.posts_dir.as_deref(), "posts"),
            pages_dir: resolve(self.content.pages_dir.as_deref(), "pages"),
        };
    }
}

/// Find `folio.toml` in `start` or the nearest parent holding one.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default_with_base(Path::new("/site"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site.title, "Folio");
        assert_eq!(config.site.recent_posts, 3);
        assert!(config.render.copy_button);
        assert!(config.render.heading_links);
        assert!(config.contact.is_none());
        assert_eq!(config.content_resolved.posts_dir, PathBuf::from("/site/posts"));
        assert_eq!(config.content_resolved.pages_dir, PathBuf::from("/site/pages"));
    }

    #[test]
    fn test_parse_sections() {
        let config: Config = toml::from_str(
            r#"
[server]
host = "0.0.0.0"
port = 3000

[site]
title = "Ada's Notes"
author = "Ada"
recent_posts = 5

[render]
copy_button = false
"#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.site.title, "Ada's Notes");
        assert_eq!(config.site.author.as_deref(), Some("Ada"));
        assert_eq!(config.site.recent_posts, 5);
        assert!(!config.render.copy_button);
        assert!(config.render.heading_links);
    }

    #[test]
    fn test_contact_endpoint_defaults_to_emailjs() {
        let config: Config = toml::from_str(
            r#"
[contact]
service_id = "svc"
template_id = "tpl"
public_key = "pk"
"#,
        )
        .unwrap();

        let contact = config.contact().unwrap().unwrap();
        assert_eq!(contact.endpoint, DEFAULT_CONTACT_ENDPOINT);
        assert_eq!(contact.private_key, None);
    }

    #[test]
    fn test_contact_requires_keys() {
        let result: Result<Config, _> = toml::from_str("[contact]\nservice_id = \"svc\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_resolves_content_relative_to_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[content]\nposts_dir = \"writing\"\n");

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.content_resolved.posts_dir, dir.path().join("writing"));
        assert_eq!(config.content_resolved.pages_dir, dir.path().join("pages"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = Config::load(Some(&missing), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().starts_with("Configuration file not found:"));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[server\nport = 1");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_cli_settings_override() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[server]\nport = 3000\n");
        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            posts_dir: Some(PathBuf::from("/elsewhere/posts")),
            pages_dir: None,
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.content_resolved.posts_dir, PathBuf::from("/elsewhere/posts"));
        assert_eq!(config.content_resolved.pages_dir, dir.path().join("pages"));
    }

    #[test]
    fn test_cli_port_zero_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "");
        let settings = CliSettings {
            port: Some(0),
            ..CliSettings::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert_eq!(err.to_string(), "Configuration error: server.port cannot be 0");
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.server.host = "  ".to_owned();

        let err = config.validate().unwrap_err();

        assert_eq!(err.to_string(), "Configuration error: server.host cannot be empty");
    }

    #[test]
    fn test_validate_recent_posts() {
        let mut config = Config::default();
        config.site.recent_posts = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_contact_endpoint_scheme() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[contact]
endpoint = "ftp://mail.example.com"
service_id = "svc"
template_id = "tpl"
public_key = "pk"
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Configuration error: contact.endpoint must start with http:// or https://"
        );
    }

    #[test]
    fn test_contact_field_expanded_with_default() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[contact]
service_id = "${FOLIO_TEST_UNSET_SERVICE:-svc_default}"
template_id = "tpl"
public_key = "pk"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.contact.unwrap().service_id, "svc_default");
    }

    #[test]
    fn test_unset_env_var_in_contact_field() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[contact]
service_id = "svc"
template_id = "tpl"
public_key = "${FOLIO_TEST_UNSET_PUBLIC_KEY}"
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Environment variable error in contact.public_key: ${FOLIO_TEST_UNSET_PUBLIC_KEY} not set"
        );
    }

    #[test]
    fn test_discover_in_parent() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "");
        let nested = dir.path().join("posts").join("drafts");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_config(&nested), Some(path));
    }

    #[test]
    fn test_discover_ignores_directory_named_like_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(CONFIG_FILENAME)).unwrap();

        let found = discover_config(dir.path());

        assert_ne!(found, Some(dir.path().join(CONFIG_FILENAME)));
    }
}
