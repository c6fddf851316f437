//! Configuration management for Unichat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, UnichatError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Unichat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat behaviour settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the assistant backend (scheme, host, optional path prefix)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the send endpoint, appended to `base_url`
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Path of the history endpoint (GET lists, DELETE removes a session)
    #[serde(default = "default_history_path")]
    pub history_path: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_chat_path() -> String {
    "/api/chat".to_string()
}

fn default_history_path() -> String {
    "/api/chat/history".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            history_path: default_history_path(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Chat behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model name sent with every message
    #[serde(default = "default_model")]
    pub model: String,

    /// Remove the optimistic user message when a send fails
    #[serde(default)]
    pub rollback_on_failure: bool,

    /// Rows shown by `sessions list` and `/sessions`
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_model() -> String {
    "default".to_string()
}

fn default_history_limit() -> usize {
    20
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            rollback_on_failure: false,
            history_limit: default_history_limit(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged. Environment variables override the file, and CLI flags
    /// override both.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| UnichatError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", path);
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("UNICHAT_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: UNICHAT_BASE_URL");
            self.server.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("UNICHAT_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.server.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid UNICHAT_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(model) = std::env::var("UNICHAT_MODEL") {
            self.chat.model = model;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            self.server.base_url = base_url.clone();
        }
        if let crate::cli::Commands::Chat {
            model: Some(model), ..
        } = &cli.command
        {
            self.chat.model = model.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.server.base_url).map_err(|e| {
            UnichatError::Config(format!(
                "Invalid server.base_url {}: {}",
                self.server.base_url, e
            ))
        })?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(UnichatError::Config(format!(
                "server.base_url must use http or https, got {}",
                base.scheme()
            ))
            .into());
        }

        for (name, path) in [
            ("server.chat_path", &self.server.chat_path),
            ("server.history_path", &self.server.history_path),
        ] {
            if !path.starts_with('/') {
                return Err(
                    UnichatError::Config(format!("{} must start with '/'", name)).into(),
                );
            }
        }

        if self.server.timeout_seconds == 0 || self.server.timeout_seconds > 600 {
            return Err(UnichatError::Config(
                "server.timeout_seconds must be between 1 and 600".to_string(),
            )
            .into());
        }

        if self.chat.model.trim().is_empty() {
            return Err(UnichatError::Config("chat.model cannot be empty".to_string()).into());
        }

        if self.chat.history_limit == 0 {
            return Err(UnichatError::Config(
                "chat.history_limit must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
