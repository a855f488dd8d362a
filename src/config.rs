//! Server configuration module
//! Handles dynamic configuration parameters for the push gateway

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{PushGateError, Result};
use std::env;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum number of simultaneous connections accepted
    pub max_connections: usize,
    /// Maximum accepted size of an inbound text frame, in bytes
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_connections: 10_000,
            max_message_size: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Create a test configuration
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_connections: 100,
            max_message_size: 1024,
        }
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = env::var("PUSHGATE_HOST").unwrap_or(defaults.host);
        let port = match env::var("PUSHGATE_PORT") {
            Ok(p) => p.parse().map_err(|_| {
                PushGateError::ConfigError(format!("PUSHGATE_PORT is not a valid port: {}", p))
            })?,
            Err(_) => defaults.port,
        };

        let max_connections = env::var("PUSHGATE_MAX_CONN")
            .ok()
            .and_then(|c| c.parse().ok())
            .unwrap_or(defaults.max_connections);

        let max_message_size = env::var("PUSHGATE_MAX_MSG_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_message_size);

        if max_connections == 0 {
            return Err(PushGateError::ConfigError(
                "PUSHGATE_MAX_CONN must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            max_connections,
            max_message_size,
        })
    }
}
