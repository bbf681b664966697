//! Configuration module.
//!
//! Supports JSON configuration files, environment variable overrides,
//! stdin input, and sensible defaults.
//!
//! # Module Structure
//!
//! - [`types`]: Root `Config` struct
//! - [`server`]: Room lifecycle and rate-limit configuration
//! - [`websocket`]: WebSocket framing and heartbeat settings
//! - [`security`]: CORS configuration
//! - [`logging`]: Logging configuration
//! - [`loader`]: Configuration loading functions
//! - [`validation`]: Configuration validation functions
//! - [`defaults`]: Default value functions

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod security;
pub mod server;
pub mod types;
pub mod validation;
pub mod websocket;

pub use loader::load;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use security::SecurityConfig;
pub use server::{RateLimitConfig, ServerConfig};
pub use types::Config;
pub use validation::{is_production_mode, validate_config_security};
pub use websocket::WebSocketConfig;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_the_bounded_constants() {
        let config = Config::default();

        assert_eq!(config.port, 8080);
        assert_eq!(config.server.max_players_per_room, 240);
        assert_eq!(config.server.room_max_age_secs, 7200);
        assert_eq!(config.server.host_disconnect_grace_secs, 300);
        assert_eq!(config.server.rate_limit.messages_per_second, 20);
        assert_eq!(config.server.rate_limit.restore_min_interval_secs, 5);
        assert_eq!(config.websocket.max_frame_bytes, 65_536);
        assert_eq!(config.websocket.heartbeat_interval_secs, 30);

        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.filename, "server.log");
        assert_eq!(config.logging.rotation, "daily");
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.port, deserialized.port);
        assert_eq!(
            config.server.max_players_per_room,
            deserialized.server.max_players_per_room
        );
        assert_eq!(
            config.websocket.max_frame_bytes,
            deserialized.websocket.max_frame_bytes
        );
    }

    #[test]
    fn log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn log_level_as_str() {
        assert_eq!(LogLevel::Trace.as_str(), "trace");
        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Error.as_str(), "error");
    }
}
