//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Default base URL of the Unreal Editor HTTP API.
pub const DEFAULT_UNREAL_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 30.0;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Remote Unreal Editor endpoint.
    pub unreal: UnrealConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration of the Unreal Editor HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnrealConfig {
    /// Base URL of the editor plugin's HTTP server, without trailing slash.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: f64,
}

impl UnrealConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }
}

impl Default for UnrealConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UNREAL_BASE_URL.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "unreal-editor-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            unreal: UnrealConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `UNREAL_BASE_URL`, `UNREAL_REQUEST_TIMEOUT`, `MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL` and the transport variables (see
    /// [`TransportConfig::from_env`]).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(base_url) = std::env::var("UNREAL_BASE_URL") {
            let base_url = base_url.trim().trim_end_matches('/');
            if !base_url.is_empty() {
                config.unreal.base_url = base_url.to_string();
            }
        }

        if let Ok(timeout) = std::env::var("UNREAL_REQUEST_TIMEOUT") {
            config.unreal.timeout_secs = parse_timeout(&timeout).unwrap_or_else(|| {
                warn!(
                    "Invalid UNREAL_REQUEST_TIMEOUT '{}', using {}s",
                    timeout, DEFAULT_REQUEST_TIMEOUT_SECS
                );
                DEFAULT_REQUEST_TIMEOUT_SECS
            });
        }

        config.transport = TransportConfig::from_env();

        config
    }
}

impl Config {
    /// Check values that would make every editor request fail.
    pub fn validate(&self) -> Result<()> {
        if self.server.name.trim().is_empty() {
            return Err(Error::config("server name must not be empty"));
        }

        let base_url = &self.unreal.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::config(format!(
                "UNREAL_BASE_URL must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        Ok(())
    }
}

/// Parse a positive, finite number of seconds.
fn parse_timeout(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
}
