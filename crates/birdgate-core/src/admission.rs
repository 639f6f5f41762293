//! Dual sliding-window admission control.
//!
//! Every outbound unit of work asks the controller first. Two trailing windows
//! are enforced at once: a short one (60 s, burst scale) and a long one
//! (3600 s, sustained scale). An attempt is recorded in both windows when it is
//! admitted and in neither when it is denied, so denials never eat quota.
//!
//! The controller only counts. It never sleeps or retries; what to do with a
//! denial (reject, queue, back off) is the caller's policy.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};

/// Span of the short (per-minute) window.
pub const SHORT_WINDOW: Duration = Duration::from_secs(60);
/// Span of the long (per-hour) window.
pub const LONG_WINDOW: Duration = Duration::from_secs(3600);

/// Upper bound on the slots a window reserves up front. Larger limits grow
/// the log on demand; its length is still capped by the limit.
const MAX_PREALLOC: usize = 4096;

/// Quota ceilings for both windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionLimits {
    /// Max admitted events in any trailing 60 s.
    pub per_minute: u32,
    /// Max admitted events in any trailing 3600 s.
    pub per_hour: u32,
}

impl Default for AdmissionLimits {
    fn default() -> Self {
        Self {
            per_minute: 30,
            per_hour: 500,
        }
    }
}

/// Which window turned an attempt away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    ShortWindow,
    LongWindow,
}

impl DenyReason {
    /// Label used in logs, metrics, and client messages.
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::ShortWindow => "minute",
            DenyReason::LongWindow => "hour",
        }
    }
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// `retry_after` is when the oldest entry of the exhausted window expires.
    /// It is a hint only; nothing is reserved for the caller.
    Denied {
        reason: DenyReason,
        retry_after: Duration,
    },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Read-only view of window occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdmissionStats {
    pub requests_last_minute: u32,
    pub requests_last_hour: u32,
    pub minute_limit: u32,
    pub hour_limit: u32,
}

/// One trailing window: an ascending log of admission times, never longer
/// than `limit`.
#[derive(Debug)]
struct Window {
    span: Duration,
    limit: usize,
    log: VecDeque<Duration>,
}

impl Window {
    fn new(span: Duration, limit: u32) -> Self {
        let limit = limit as usize;
        Self {
            span,
            limit,
            log: VecDeque::with_capacity(limit.min(MAX_PREALLOC)),
        }
    }

    /// Drop entries aged `span` or more. Entries stamped after `now` (the
    /// clock went backwards) are pulled down to `now` first, which keeps the
    /// log sorted since they can only sit at the tail.
    fn purge(&mut self, now: Duration) {
        for ts in self.log.iter_mut().rev() {
            if *ts <= now {
                break;
            }
            *ts = now;
        }
        while let Some(&oldest) = self.log.front() {
            if now.saturating_sub(oldest) < self.span {
                break;
            }
            self.log.pop_front();
        }
    }

    fn is_full(&self) -> bool {
        self.log.len() >= self.limit
    }

    fn retry_after(&self, now: Duration) -> Duration {
        self.log
            .front()
            .map(|&oldest| (oldest + self.span).saturating_sub(now))
            .unwrap_or_default()
    }

    fn record(&mut self, now: Duration) {
        self.log.push_back(now);
    }

    /// Entries that would survive a purge at `now`, without purging.
    fn live(&self, now: Duration) -> u32 {
        self.log
            .iter()
            .filter(|&&ts| now.saturating_sub(ts) < self.span)
            .count() as u32
    }
}

#[derive(Debug)]
struct Windows {
    short: Window,
    long: Window,
}

/// Shared admission controller.
/// Construct once at startup, then share via Arc.
pub struct AdmissionController {
    limits: AdmissionLimits,
    clock: Arc<dyn Clock>,
    windows: Mutex<Windows>,
}

impl AdmissionController {
    /// Controller on the wall clock.
    pub fn new(limits: AdmissionLimits) -> Self {
        Self::with_clock(limits, Arc::new(SystemClock))
    }

    /// Controller on an injected clock. Zero limits are raised to 1.
    pub fn with_clock(limits: AdmissionLimits, clock: Arc<dyn Clock>) -> Self {
        let limits = AdmissionLimits {
            per_minute: limits.per_minute.max(1),
            per_hour: limits.per_hour.max(1),
        };
        tracing::info!(
            per_minute = limits.per_minute,
            per_hour = limits.per_hour,
            "admission controller ready"
        );

        Self {
            limits,
            clock,
            windows: Mutex::new(Windows {
                short: Window::new(SHORT_WINDOW, limits.per_minute),
                long: Window::new(LONG_WINDOW, limits.per_hour),
            }),
        }
    }

    pub fn limits(&self) -> AdmissionLimits {
        self.limits
    }

    /// Ask to proceed with one unit of work. Records it when admitted.
    pub fn try_admit(&self) -> bool {
        self.check().is_admitted()
    }

    /// Same as [`try_admit`](Self::try_admit) but reports why a denial happened.
    /// The short window is consulted first, so it wins when both are exhausted.
    pub fn check(&self) -> Admission {
        let decision = {
            let mut w = self.lock();
            // Clock is read under the lock so appends stay in order.
            let now = self.clock.now();
            w.short.purge(now);
            w.long.purge(now);

            if w.short.is_full() {
                Admission::Denied {
                    reason: DenyReason::ShortWindow,
                    retry_after: w.short.retry_after(now),
                }
            } else if w.long.is_full() {
                Admission::Denied {
                    reason: DenyReason::LongWindow,
                    retry_after: w.long.retry_after(now),
                }
            } else {
                w.short.record(now);
                w.long.record(now);
                Admission::Admitted
            }
        };

        if let Admission::Denied { reason, retry_after } = decision {
            tracing::warn!(
                reason = reason.as_str(),
                retry_after_ms = retry_after.as_millis() as u64,
                "admission denied"
            );
        }
        decision
    }

    /// Occupancy snapshot. Counts only entries still inside their window and
    /// leaves the logs untouched.
    pub fn stats(&self) -> AdmissionStats {
        let w = self.lock();
        let now = self.clock.now();
        AdmissionStats {
            requests_last_minute: w.short.live(now),
            requests_last_hour: w.long.live(now),
            minute_limit: self.limits.per_minute,
            hour_limit: self.limits.per_hour,
        }
    }

    // Nothing inside the critical section can panic between the two appends,
    // so a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, Windows> {
        self.windows.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn purge_is_half_open_on_the_old_side() {
        let mut w = Window::new(SHORT_WINDOW, 4);
        w.record(secs(100));
        w.record(secs(100) + Duration::from_millis(1));

        w.purge(secs(160));
        assert_eq!(w.log.len(), 1, "entry exactly 60s old must expire");
        assert_eq!(w.log.front().copied(), Some(secs(100) + Duration::from_millis(1)));
    }

    #[test]
    fn purge_clamps_future_entries_to_now() {
        let mut w = Window::new(SHORT_WINDOW, 4);
        w.record(secs(10));
        w.record(secs(500));
        w.record(secs(600));

        w.purge(secs(50));
        assert_eq!(w.log.iter().copied().collect::<Vec<_>>(), vec![secs(10), secs(50), secs(50)]);
    }

    #[test]
    fn retry_after_points_at_oldest_expiry() {
        let mut w = Window::new(SHORT_WINDOW, 2);
        w.record(secs(0));
        w.record(secs(20));
        assert_eq!(w.retry_after(secs(45)), secs(15));

        let empty = Window::new(SHORT_WINDOW, 2);
        assert_eq!(empty.retry_after(secs(45)), Duration::ZERO);
    }

    #[test]
    fn live_count_ignores_stale_entries_without_removing_them() {
        let mut w = Window::new(SHORT_WINDOW, 3);
        w.record(secs(0));
        w.record(secs(30));
        w.record(secs(70));

        assert_eq!(w.live(secs(80)), 2);
        assert_eq!(w.log.len(), 3);
    }

    #[test]
    fn huge_limit_reserves_bounded_capacity() {
        let mut w = Window::new(LONG_WINDOW, u32::MAX);
        assert!(w.log.capacity() < 2 * MAX_PREALLOC);
        w.record(secs(1));
        assert!(!w.is_full());

        let c = AdmissionController::new(AdmissionLimits { per_minute: u32::MAX, per_hour: u32::MAX });
        assert!(c.try_admit());
        assert_eq!(c.stats().requests_last_hour, 1);
    }

    #[test]
    fn zero_limits_are_raised_to_one() {
        let c = AdmissionController::new(AdmissionLimits { per_minute: 0, per_hour: 0 });
        assert_eq!(c.limits(), AdmissionLimits { per_minute: 1, per_hour: 1 });
        assert!(c.try_admit());
        assert!(!c.try_admit());
    }
}
