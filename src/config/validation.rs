//! Configuration validation functions.

use super::Config;

/// Sanity-check the bounded constants a deployer might override.
///
/// There is no authentication or TLS layer to validate here (spec
/// Non-goals); this only guards against nonsensical values that would
/// make the relay unusable.
pub fn validate_config_security(config: &Config) -> anyhow::Result<()> {
    if config.server.max_players_per_room == 0 {
        anyhow::bail!("server.max_players_per_room must be greater than zero");
    }
    if config.server.rate_limit.messages_per_second == 0 {
        anyhow::bail!("server.rate_limit.messages_per_second must be greater than zero");
    }
    if config.websocket.max_frame_bytes == 0 {
        anyhow::bail!("websocket.max_frame_bytes must be greater than zero");
    }
    if config.websocket.heartbeat_interval_secs == 0 {
        anyhow::bail!("websocket.heartbeat_interval_secs must be greater than zero");
    }
    Ok(())
}

/// Detect if we're running in production mode.
///
/// Checks the `QUIZ_RELAY__ENVIRONMENT` nested override or the generic
/// `PRODUCTION` / `PROD` environment variables.
pub fn is_production_mode() -> bool {
    use std::env;

    if let Ok(mode) = env::var("QUIZ_RELAY__ENVIRONMENT") {
        return mode.eq_ignore_ascii_case("production") || mode.eq_ignore_ascii_case("prod");
    }

    env::var("QUIZ_RELAY_PRODUCTION").is_ok()
        || env::var("PRODUCTION").is_ok()
        || env::var("PROD").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        assert!(validate_config_security(&Config::default()).is_ok());
    }

    #[test]
    fn zero_max_players_fails_validation() {
        let mut config = Config::default();
        config.server.max_players_per_room = 0;
        assert!(validate_config_security(&config).is_err());
    }
}
