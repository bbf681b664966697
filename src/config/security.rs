//! Transport-level security configuration.
//!
//! The relay has no authentication layer: any client
//! that can reach the port may speak the protocol. The only remaining
//! security knob is which browser origins may open a WebSocket to us.

use super::defaults::default_cors_origins;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    /// Comma-separated list of allowed CORS origins, or `"*"` for any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: default_cors_origins(),
        }
    }
}

impl SecurityConfig {
    /// Parsed, trimmed list of individual origins. Empty when `cors_origins`
    /// is `"*"` (callers should treat that as "allow any").
    pub fn origin_list(&self) -> Vec<String> {
        if self.cors_origins.trim() == "*" {
            return Vec::new();
        }
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.trim() == "*"
    }
}
