//! WebSocket transport configuration.

use super::defaults::{default_heartbeat_interval_secs, default_max_frame_bytes};
use serde::{Deserialize, Serialize};

/// Per-connection framing and heartbeat configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebSocketConfig {
    /// Largest inbound text frame accepted before the connection is closed.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
    /// Interval between server-initiated WebSocket pings.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: default_max_frame_bytes(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
        }
    }
}
