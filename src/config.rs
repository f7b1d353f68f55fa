//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::{ClientConfig, DEFAULT_BASE_URL};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_upload_chunk_size")]
    pub upload_chunk_size: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_upload_chunk_size() -> usize {
    64 * 1024 // 64 KB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            upload_chunk_size: default_upload_chunk_size(),
        }
    }
}

/// Persisted session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// File holding the token and theme entries
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

fn default_store_path() -> String {
    dirs::config_dir()
        .map(|p| p.join("docchat").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./docchat_session.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// A file that exists but cannot be read or parsed is an error, not a
    /// silent fallback to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("docchat").join("config.toml")),
            Some(PathBuf::from("./docchat.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first of `paths` that exists, or fall back to the environment
    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Settings for the API client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            request_timeout_secs: self.api.request_timeout_secs,
            upload_chunk_size: self.api.upload_chunk_size,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = lookup("DOCCHAT_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("DOCCHAT_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = secs;
            }
        }

        // Session overrides
        if let Some(path) = lookup("DOCCHAT_SESSION_FILE") {
            self.session.store_path = path;
        }

        // Logging overrides
        if let Some(level) = lookup("DOCCHAT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DOCCHAT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# DocChat Configuration
#
# Environment variables override these settings:
# - DOCCHAT_API_URL
# - DOCCHAT_TIMEOUT_SECS
# - DOCCHAT_SESSION_FILE
# - DOCCHAT_LOG_LEVEL
# - DOCCHAT_LOG_FORMAT

[api]
# Backend base URL
base_url = "http://127.0.0.1:8001/api/v1"

# Request timeout (seconds); LLM calls can be slow
request_timeout_secs = 120

# Upload chunk size (bytes)
upload_chunk_size = 65536

[session]
# File holding the login token and theme preference
# store_path = "~/.config/docchat/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty, json
format = "pretty"
"#
    .to_string()
}
