//! Configuration module for cloudbak.
//!
//! Provides typed configuration structs that map to the JSON options file
//! read once at startup, with loading, validation, defaults, and a builder
//! for programmatic use (mostly tests).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default location of the options document inside the container.
const DEFAULT_OPTIONS_PATH: &str = "/data/options.json";

/// Top-level configuration for cloudbak.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub transport: TransportConfig,
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    /// Directory scanned for local backup archives.
    pub backup_dir: PathBuf,
    /// File the token record is persisted to.
    pub token_file: PathBuf,
    /// Cron expression for the scheduled upload cycle.
    pub schedule: String,
}

/// Remote storage account and retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// OAuth application (client) id.
    pub client_id: String,
    /// OAuth application (client) secret.
    pub client_secret: String,
    /// Remote directory the backups are uploaded into.
    pub base_path: String,
    /// Maximum number of backup files kept remotely.
    pub max_files: usize,
    /// OAuth authorization endpoint (where the user gets a check code).
    pub auth_url: String,
    /// OAuth token endpoint.
    pub token_url: String,
    /// Base URL of the storage REST API.
    pub api_url: String,
}

/// Transport retry and timeout settings, applied to every remote call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Retry attempts after the first failure.
    pub retries: u32,
    /// Fixed pause between attempts, in seconds.
    pub backoff_secs: u64,
    /// TCP connect timeout, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request read timeout, in seconds. Uploads of multi-gigabyte
    /// archives need this generous.
    pub read_timeout_secs: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

/// HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the HTTP surface listens on.
    pub port: u16,
    /// How many days before expiry the token is refreshed.
    pub refresh_lead_days: i64,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Default path of the options document.
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_OPTIONS_PATH)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            base_path: "app:/backups".to_string(),
            max_files: 10,
            auth_url: "https://oauth.yandex.com/authorize".to_string(),
            token_url: "https://oauth.yandex.com/token".to_string(),
            api_url: "https://cloud-api.yandex.net/v1/disk".to_string(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff_secs: 5,
            connect_timeout_secs: 15,
            read_timeout_secs: 250,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8099,
            refresh_lead_days: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            transport: TransportConfig::default(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
            backup_dir: PathBuf::from("/backup"),
            token_file: PathBuf::from("/data/token.json"),
            schedule: "0 0 3 * * *".to_string(),
        }
    }
}

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"remote.max_files"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.remote.client_id.is_empty() {
            errors.push(ValidationError {
                field: "remote.client_id".into(),
                message: "must not be empty".into(),
            });
        }
        if self.remote.client_secret.is_empty() {
            errors.push(ValidationError {
                field: "remote.client_secret".into(),
                message: "must not be empty".into(),
            });
        }
        if self.remote.base_path.is_empty() || self.remote.base_path.ends_with('/') {
            errors.push(ValidationError {
                field: "remote.base_path".into(),
                message: "must be non-empty without a trailing slash".into(),
            });
        }
        if self.remote.max_files == 0 {
            errors.push(ValidationError {
                field: "remote.max_files".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.transport.connect_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "transport.connect_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.transport.read_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "transport.read_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if self.schedule.is_empty() {
            errors.push(ValidationError {
                field: "schedule".into(),
                message: "must not be empty".into(),
            });
        }
        if self.server.refresh_lead_days <= 0 {
            errors.push(ValidationError {
                field: "server.refresh_lead_days".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.backup_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "backup_dir".into(),
                message: "must not be empty".into(),
            });
        }
        if self.token_file.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "token_file".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.config.remote.client_id = id.into();
        self
    }

    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.remote.client_secret = secret.into();
        self
    }

    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.config.remote.base_path = path.into();
        self
    }

    pub fn max_files(mut self, n: usize) -> Self {
        self.config.remote.max_files = n;
        self
    }

    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote.auth_url = url.into();
        self
    }

    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote.token_url = url.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote.api_url = url.into();
        self
    }

    pub fn retries(mut self, n: u32) -> Self {
        self.config.transport.retries = n;
        self
    }

    pub fn backoff_secs(mut self, secs: u64) -> Self {
        self.config.transport.backoff_secs = secs;
        self
    }

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn backup_dir(mut self, dir: PathBuf) -> Self {
        self.config.backup_dir = dir;
        self
    }

    pub fn token_file(mut self, file: PathBuf) -> Self {
        self.config.token_file = file;
        self
    }

    pub fn schedule(mut self, expr: impl Into<String>) -> Self {
        self.config.schedule = expr.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
