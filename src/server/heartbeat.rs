//! Per-connection liveness tracking via periodic ping frames.
//!
//! Every 30 seconds the connection layer pings its peer and expects a
//! pong before the next sweep; a connection that misses one is closed.

use std::time::Duration;
use tokio::time::{Instant, Interval};

/// Tracks whether a connection answered the most recent ping before the
/// next sweep comes due.
pub struct Heartbeat {
    interval: Interval,
    pong_received: bool,
}

impl Heartbeat {
    pub fn new(period: Duration) -> Self {
        let interval = tokio::time::interval_at(Instant::now() + period, period);
        Self {
            interval,
            pong_received: true,
        }
    }

    /// Wait for the next sweep. Returns `false` if the previous ping went
    /// unanswered, in which case the caller must close the connection.
    /// Otherwise marks the connection "not alive" until the next pong.
    pub async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        if !self.pong_received {
            return false;
        }
        self.pong_received = false;
        true
    }

    pub fn record_pong(&mut self) {
        self.pong_received = true;
    }
}
