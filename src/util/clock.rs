//! Clocks used for timestamps and offer deadlines.
//!
//! All deadline arithmetic goes through the [`Clock`] trait so the waiting list
//! can be driven by tokio's (pausable) clock in production and tests alike.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Monotonic time source, in milliseconds.
pub trait Clock: Send + Sync + 'static {
    /// Current time in milliseconds. Never decreases between calls.
    fn now_ms(&self) -> u128;
}

/// Monotonic clock anchored at the wall-clock time of its creation.
///
/// Elapsed time is measured with [`tokio::time::Instant`], so a paused tokio
/// runtime (`tokio::time::pause`) freezes this clock together with every
/// offer timer.
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
    origin_ms: u128,
}

impl TokioClock {
    /// Create a clock anchored at the current wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
            origin_ms: now_ms(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u128 {
        self.origin_ms + self.origin.elapsed().as_millis()
    }
}

/// Manually advanced clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `start_ms`.
    #[must_use]
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.now.fetch_add(millis, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u128 {
        u128::from(self.now.load(Ordering::Acquire))
    }
}
