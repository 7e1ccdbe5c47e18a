//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, once at startup; handlers read it from shared state (no
//! ambient globals).

use serde::{Deserialize, Serialize};
use std::env;

use ramen_core::DEFAULT_LOW_STOCK_THRESHOLD;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Bind address
    pub bind_addr: String,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Stock at or below this level is reported as "low stock"
    pub low_stock_threshold: i64,

    /// Capacity of the kitchen event broadcast channel
    pub event_channel_capacity: usize,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("RAMEN_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RAMEN_PORT".to_string()))?,

            bind_addr: env::var("RAMEN_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),

            database_path: env::var("RAMEN_DATABASE_PATH")
                .unwrap_or_else(|_| "./ramen.db".to_string()),

            low_stock_threshold: env::var("RAMEN_LOW_STOCK_THRESHOLD")
                .unwrap_or_else(|_| DEFAULT_LOW_STOCK_THRESHOLD.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RAMEN_LOW_STOCK_THRESHOLD".to_string()))?,

            event_channel_capacity: env::var("RAMEN_EVENT_CHANNEL_CAPACITY")
                .unwrap_or_else(|_| "256".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("RAMEN_EVENT_CHANNEL_CAPACITY".to_string())
                })?,
        };

        if config.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue(
                "RAMEN_LOW_STOCK_THRESHOLD".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ApiConfig {
            port: 8080,
            bind_addr: "127.0.0.1".to_string(),
            database_path: "./ramen.db".to_string(),
            low_stock_threshold: 10,
            event_channel_capacity: 256,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
