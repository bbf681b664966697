//! Default value functions for configuration fields.
//!
//! This module contains all the default value functions used by serde's
//! `#[serde(default = ...)]` attributes throughout the configuration system.

use super::logging::LogFormat;

// =============================================================================
// Port
// =============================================================================

pub const fn default_port() -> u16 {
    8080
}

// =============================================================================
// Server / room lifecycle
// =============================================================================

pub const fn default_max_players_per_room() -> usize {
    240
}

pub const fn default_room_max_age_secs() -> u64 {
    2 * 60 * 60
}

pub const fn default_host_disconnect_grace_secs() -> u64 {
    5 * 60
}

// =============================================================================
// Rate limiting
// =============================================================================

pub const fn default_rate_limit_per_second() -> u32 {
    20
}

pub const fn default_restore_min_interval_secs() -> u64 {
    5
}

// =============================================================================
// WebSocket
// =============================================================================

pub const fn default_heartbeat_interval_secs() -> u64 {
    30
}

pub const fn default_max_frame_bytes() -> usize {
    65_536
}

// =============================================================================
// Security
// =============================================================================

pub fn default_cors_origins() -> String {
    "*".to_string()
}

// =============================================================================
// Logging
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "server.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    true
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
