//! Per-connection rate limiting.

use tokio::time::{Duration, Instant};

/// Messages allowed per rolling 1-second window before the first error
/// frame is sent.
pub const SOFT_LIMIT_PER_SECOND: u32 = 20;

/// Messages in the same window after which the channel is forcibly
/// closed (3x the soft limit).
pub const HARD_CLOSE_MULTIPLIER: u32 = 3;

/// Minimum spacing between `restore_room` attempts on one channel.
pub const RESTORE_MIN_INTERVAL: Duration = Duration::from_secs(5);

/// What a connection should do with the message that was just counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Under the soft limit: process the message normally.
    Allow,
    /// Over the soft limit but under the hard-close threshold: drop the
    /// message and send an `error` frame.
    RejectWithError,
    /// Past the hard-close threshold: the channel must be closed.
    Close,
}

/// Fixed 1-second window message counter for a single connection.
pub struct MessageRateLimiter {
    soft_limit: u32,
    hard_limit: u32,
    window_start: Instant,
    count: u32,
}

impl MessageRateLimiter {
    pub fn new() -> Self {
        Self::with_limits(
            SOFT_LIMIT_PER_SECOND,
            SOFT_LIMIT_PER_SECOND * HARD_CLOSE_MULTIPLIER,
        )
    }

    pub fn with_limits(soft_limit: u32, hard_limit: u32) -> Self {
        Self {
            soft_limit,
            hard_limit,
            window_start: Instant::now(),
            count: 0,
        }
    }

    /// Record one inbound message and decide what to do with it.
    pub fn record(&mut self) -> RateLimitDecision {
        if self.window_start.elapsed() >= Duration::from_secs(1) {
            self.window_start = Instant::now();
            self.count = 0;
        }
        self.count += 1;
        if self.count > self.hard_limit {
            RateLimitDecision::Close
        } else if self.count > self.soft_limit {
            RateLimitDecision::RejectWithError
        } else {
            RateLimitDecision::Allow
        }
    }
}

impl Default for MessageRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Enforces `RESTORE_MIN_INTERVAL` between `restore_room` attempts on a
/// single channel.
pub struct RestoreRateLimiter {
    min_interval: Duration,
    last_attempt: Option<Instant>,
}

impl RestoreRateLimiter {
    pub fn new() -> Self {
        Self::with_interval(RESTORE_MIN_INTERVAL)
    }

    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_attempt: None,
        }
    }

    /// Returns `true` and records the attempt if enough time has
    /// elapsed since the last one.
    pub fn try_attempt(&mut self) -> bool {
        let now = Instant::now();
        if let Some(last) = self.last_attempt {
            if now.duration_since(last) < self.min_interval {
                return false;
            }
        }
        self.last_attempt = Some(now);
        true
    }
}

impl Default for RestoreRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
