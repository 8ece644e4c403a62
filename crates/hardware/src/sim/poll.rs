//! Empty-poll handling for the dispatch loop.
//!
//! The transport is polled without blocking. When a poll comes back empty the
//! `Poller` decides how to wait before the next one: spin, yield the thread, or
//! back off exponentially into short sleeps. A serviced packet resets the backoff,
//! so bursts of traffic are handled at full speed.

use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::config::PollConfig;

/// Wait strategy applied after an empty poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PollStrategy {
    /// Busy-wait with a spin-loop hint.
    Spin,
    /// Give up the rest of the time slice.
    #[default]
    Yield,
    /// Spin for a while, then sleep with exponentially growing delays.
    Backoff,
}

/// Tracks consecutive empty polls and applies the configured wait.
#[derive(Debug, Clone)]
pub struct Poller {
    strategy: PollStrategy,
    spin_limit: u32,
    max_sleep: Duration,
    idle_polls: u32,
}

impl Poller {
    /// Creates a poller from configuration.
    pub const fn new(config: &PollConfig) -> Self {
        Self {
            strategy: config.strategy,
            spin_limit: config.spin_limit,
            max_sleep: Duration::from_micros(config.max_sleep_us),
            idle_polls: 0,
        }
    }

    /// Records an empty poll and waits according to the strategy.
    pub fn idle(&mut self) {
        let delay = self.next_delay();
        self.idle_polls = self.idle_polls.saturating_add(1);
        match self.strategy {
            PollStrategy::Spin => std::hint::spin_loop(),
            PollStrategy::Yield => thread::yield_now(),
            PollStrategy::Backoff => {
                if delay.is_zero() {
                    std::hint::spin_loop();
                } else {
                    thread::sleep(delay);
                }
            }
        }
    }

    /// Records a serviced packet, restarting the backoff sequence.
    pub const fn reset(&mut self) {
        self.idle_polls = 0;
    }

    /// Consecutive empty polls since the last serviced packet.
    pub const fn idle_polls(&self) -> u32 {
        self.idle_polls
    }

    /// Delay the next `idle` call will sleep for; zero while spinning or for non-backoff strategies.
    ///
    /// Past the spin limit the delay starts at 1 µs and doubles per empty poll, capped
    /// at the configured maximum.
    pub fn next_delay(&self) -> Duration {
        if self.strategy != PollStrategy::Backoff || self.idle_polls < self.spin_limit {
            return Duration::ZERO;
        }
        let exponent = (self.idle_polls - self.spin_limit).min(63);
        let micros = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        Duration::from_micros(micros).min(self.max_sleep)
    }
}
