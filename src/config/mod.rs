/// Configuration management for Hookflow
///
/// Handles server configuration and the location of the durable store.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Durable store configuration
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Durable store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the store database (default: "data")
    /// Creates: {data_dir}/hookflow.db
    pub data_dir: String,
}

impl Config {
    /// Build configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server: ServerConfig {
                host: lookup("HOOKFLOW_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("HOOKFLOW_PORT")
                    .and_then(|port| port.parse().ok())
                    .unwrap_or(3004),
            },
            storage: StorageConfig {
                data_dir: lookup("HOOKFLOW_DATA_DIR").unwrap_or_else(|| "data".to_string()),
            },
        }
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self::from_env()
    }
}
