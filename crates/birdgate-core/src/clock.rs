//! Time source used by the admission controller.
//!
//! Timestamps are `Duration`s since the Unix epoch. Production code reads the
//! wall clock; tests drive a `ManualClock` so window expiry can be simulated
//! without sleeping.

use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Injectable time capability.
pub trait Clock: Send + Sync {
    /// Current time as an offset from the Unix epoch.
    fn now(&self) -> Duration;
}

/// Wall clock. Not guaranteed monotonic.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        // A clock set before 1970 reads as the epoch itself.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new(start: Duration) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut g = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *g = g.saturating_add(by);
    }

    /// Jump to an absolute reading. May move backwards.
    pub fn set(&self, to: Duration) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}
