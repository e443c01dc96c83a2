//! Application configuration with TOML file support.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::VERIFY_PATH;
use crate::logging::{self, LogFormat};
use crate::prelude::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("bot_username must not be empty")]
    MissingBotUsername,
}

/// Chain the wallet connector talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[display(fmt = "mainnet")]
    Mainnet,
    #[default]
    #[display(fmt = "testnet")]
    Testnet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: Network,

    /// Telegram bot used by the login widget.
    pub bot_username: String,

    /// Base URL of the verification backend.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn new(bot_username: impl Into<String>) -> Self {
        Self {
            network: Network::default(),
            bot_username: bot_username.into(),
            api_base_url: default_api_base_url(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or is invalid.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path, network = %config.network, "config loaded");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` for malformed TOML or an empty bot username.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        if config.bot_username.trim().is_empty() {
            return Err(ConfigError::MissingBotUsername);
        }
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError::Serialize` if TOML encoding fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Installs logging as configured.
    ///
    /// # Errors
    /// Returns `Error::Logging` if a global subscriber is already set.
    pub fn init_logging(&self) -> crate::Result<()> {
        logging::init_logging(self.log_format, &self.log_level)?;
        Ok(())
    }

    /// Full URL of the verification endpoint.
    pub fn verify_url(&self) -> String {
        format!("{}{VERIFY_PATH}", self.api_base_url.trim_end_matches('/'))
    }
}
