// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Backoff strategies spacing watch reconnects and deletion polls.
//!
//! The strategy is injected into every waiter instead of living in a mutable
//! global, so tests can swap in a fast one.

use std::time::Duration;

/// Maps a retry-attempt number to the delay before the next attempt.
pub trait Backoff: Send + Sync {
    fn delay(&self, attempt: u32) -> Duration;
}

/// Default delay between poll/reconnect attempts in seconds
pub const DEFAULT_DELAY_SECS: u64 = 5;

/// A constant delay between attempts
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        FixedDelay(Duration::from_secs(DEFAULT_DELAY_SECS))
    }
}

impl Backoff for FixedDelay {
    fn delay(&self, _attempt: u32) -> Duration {
        self.0
    }
}

/// A delay that doubles per attempt up to a cap
#[derive(Debug, Clone, Copy)]
pub struct ExponentialDelay {
    pub initial: Duration,
    pub cap: Duration,
}

impl ExponentialDelay {
    pub fn new(initial: Duration, cap: Duration) -> Self {
        ExponentialDelay { initial, cap }
    }
}

impl Backoff for ExponentialDelay {
    fn delay(&self, attempt: u32) -> Duration {
        // clamp the exponent so the multiplication cannot overflow
        let factor = 2u32.saturating_pow(attempt.min(16));
        (self.initial * factor).min(self.cap)
    }
}
