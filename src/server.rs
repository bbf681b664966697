//! Shared server state handed to every connection task (high-level
//! components C through G).

pub mod dispatch;
pub mod handlers;
pub mod heartbeat;
pub mod lifecycle;

use crate::config::Config;
use crate::registry::RoomRegistry;
use std::sync::Arc;

/// Process-wide state: the room registry plus the configuration every
/// handler and the lifecycle manager consult.
pub struct QuizRelayServer {
    pub registry: RoomRegistry,
    pub config: Config,
}

impl QuizRelayServer {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            registry: RoomRegistry::new(),
            config,
        })
    }

    pub fn max_players_per_room(&self) -> usize {
        self.config.server.max_players_per_room
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_server_starts_with_an_empty_registry() {
        let server = QuizRelayServer::new(Config::default());
        assert!(server.registry.is_empty());
    }
}
