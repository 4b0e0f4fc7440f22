//! Polite delay between successive page requests.

use std::time::Duration;

use rand::Rng;

/// Base delay plus uniform random jitter, applied between page fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    base: Duration,
    jitter: Duration,
}

impl Pacing {
    /// No delay at all; used by tests and single-page runs.
    pub const NONE: Pacing = Pacing {
        base: Duration::ZERO,
        jitter: Duration::ZERO,
    };

    #[must_use]
    pub const fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    #[must_use]
    pub const fn fixed(base: Duration) -> Self {
        Self::new(base, Duration::ZERO)
    }

    #[must_use]
    pub fn base(&self) -> Duration {
        self.base
    }

    /// Draws the next delay from `[base, base + jitter]`.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return self.base;
        }
        let extra = rand::rng().random_range(0..=jitter_ms);
        self.base.saturating_add(Duration::from_millis(extra))
    }

    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
