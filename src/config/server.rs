//! Room lifecycle and rate-limit configuration.

use super::defaults::{
    default_host_disconnect_grace_secs, default_max_players_per_room,
    default_rate_limit_per_second, default_restore_min_interval_secs, default_room_max_age_secs,
};
use serde::{Deserialize, Serialize};

/// Server-side room behavior: capacity and lifetime bounds.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Hard cap on players per room.
    #[serde(default = "default_max_players_per_room")]
    pub max_players_per_room: usize,
    /// How long an idle room may live before the expiry sweep closes it.
    #[serde(default = "default_room_max_age_secs")]
    pub room_max_age_secs: u64,
    /// Grace period after the host disconnects before the room is torn down.
    #[serde(default = "default_host_disconnect_grace_secs")]
    pub host_disconnect_grace_secs: u64,
    /// Per-connection message rate limiting.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_players_per_room: default_max_players_per_room(),
            room_max_age_secs: default_room_max_age_secs(),
            host_disconnect_grace_secs: default_host_disconnect_grace_secs(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Per-connection rate limiting.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateLimitConfig {
    /// Messages allowed per rolling 1-second window before an error frame.
    #[serde(default = "default_rate_limit_per_second")]
    pub messages_per_second: u32,
    /// Minimum spacing between `restore_room` attempts on one channel.
    #[serde(default = "default_restore_min_interval_secs")]
    pub restore_min_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            messages_per_second: default_rate_limit_per_second(),
            restore_min_interval_secs: default_restore_min_interval_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_bounded_constants() {
        let config = ServerConfig::default();
        assert_eq!(config.max_players_per_room, 240);
        assert_eq!(config.room_max_age_secs, 7200);
        assert_eq!(config.host_disconnect_grace_secs, 300);
        assert_eq!(config.rate_limit.messages_per_second, 20);
        assert_eq!(config.rate_limit.restore_min_interval_secs, 5);
    }
}
