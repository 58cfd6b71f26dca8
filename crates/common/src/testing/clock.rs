//! Deterministic clock for tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, TimeDelta, Utc};
use parking_lot::Mutex;

use crate::time::Clock;

#[derive(Debug)]
struct MockClockState {
    now: DateTime<Utc>,
    sleeps: Vec<Duration>,
}

/// Mock clock whose time only moves when told to
///
/// `sleep` returns immediately, advancing the mock time by the requested
/// duration and recording it, so rate-limit waits can be asserted without
/// real delays. Clones share state.
#[derive(Debug, Clone)]
pub struct MockClock {
    state: Arc<Mutex<MockClockState>>,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    /// Create a mock clock starting at 2024-01-01T00:00:00Z.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
        Self::starting_at(start)
    }

    /// Mock clock frozen at `now`.
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self { state: Arc::new(Mutex::new(MockClockState { now, sleeps: Vec::new() })) }
    }

    /// Move time forward.
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.now += to_delta(duration);
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: DateTime<Utc>) {
        self.state.lock().now = now;
    }

    /// Every duration passed to `sleep`, in call order.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().sleeps.clone()
    }

    /// Sum of every recorded sleep.
    #[must_use]
    pub fn total_slept(&self) -> Duration {
        self.state.lock().sleeps.iter().sum()
    }
}

#[async_trait]
impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.state.lock().now
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.now += to_delta(duration);
        state.sleeps.push(duration);
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
