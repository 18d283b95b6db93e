//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the search-history engine,
//! supporting TOML files and environment variable overrides with validation
//! and type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation, dependency verification
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (`HISTORY_SEARCH_*`)
//! 2. Configuration file
//! 3. Default values
//!
//! ## Usage
//! ```rust,no_run
//! use search_history_engine::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Backend collaborator settings
    pub backend: BackendConfig,
    /// Query engine behavior
    pub engine: EngineConfig,
    /// Logging and monitoring
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable CORS for the web frontend
    pub enable_cors: bool,
}

/// Backend collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend REST API
    pub base_url: String,
    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
    /// Page size requested when resolving a remote match query.
    /// Large on purpose: the matcher only needs the ids, so one page
    /// must cover the whole history.
    pub remote_match_limit: u32,
    /// Default page size for history listings
    pub default_page_limit: u32,
}

/// Query engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Quiet interval before a remote match request fires, in milliseconds
    pub debounce_ms: u64,
    /// Tribunal keywords recognized by the classifier (lowercase)
    pub tribunal_keywords: Vec<String>,
}

/// Logging and monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl BackendConfig {
    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl EngineConfig {
    /// Debounce delay as a `Duration`
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| EngineError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| EngineError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HISTORY_SEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("HISTORY_SEARCH_PORT") {
            self.server.port = port.parse().map_err(|_| EngineError::Config {
                message: "Invalid port number in HISTORY_SEARCH_PORT".to_string(),
            })?;
        }
        if let Ok(url) = std::env::var("HISTORY_SEARCH_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Ok(level) = std::env::var("HISTORY_SEARCH_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(EngineError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.backend.base_url.is_empty() {
            return Err(EngineError::ValidationFailed {
                field: "backend.base_url".to_string(),
                reason: "Backend URL cannot be empty".to_string(),
            });
        }

        if self.backend.remote_match_limit == 0 {
            return Err(EngineError::ValidationFailed {
                field: "backend.remote_match_limit".to_string(),
                reason: "Remote match page size must be greater than zero".to_string(),
            });
        }

        if self.engine.tribunal_keywords.is_empty() {
            return Err(EngineError::ValidationFailed {
                field: "engine.tribunal_keywords".to_string(),
                reason: "At least one tribunal keyword is required".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                enable_cors: true,
            },
            backend: BackendConfig {
                base_url: "http://127.0.0.1:8000/api".to_string(),
                request_timeout_seconds: 30,
                remote_match_limit: 1000,
                default_page_limit: 20,
            },
            engine: EngineConfig {
                debounce_ms: 500,
                tribunal_keywords: vec![
                    "tjsp".to_string(),
                    "trf".to_string(),
                    "trt".to_string(),
                    "tst".to_string(),
                    "stj".to_string(),
                    "stf".to_string(),
                ],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let toml_str = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.engine.tribunal_keywords, config.engine.tribunal_keywords);
    }
}
