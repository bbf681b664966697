//! Root configuration types.

use super::defaults::default_port;
use super::logging::LoggingConfig;
use super::security::SecurityConfig;
use super::server::ServerConfig;
use super::websocket::WebSocketConfig;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub websocket: WebSocketConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            server: ServerConfig::default(),
            websocket: WebSocketConfig::default(),
            logging: LoggingConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}
