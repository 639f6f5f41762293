//! Concurrent callers sharing one controller.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use birdgate_core::{AdmissionController, AdmissionLimits, ManualClock};

#[test]
fn simultaneous_callers_never_overshoot_the_limit() {
    let clock = Arc::new(ManualClock::new(Duration::from_secs(1_000)));
    let c = AdmissionController::with_clock(
        AdmissionLimits { per_minute: 5, per_hour: 500 },
        clock,
    );
    let callers = 20;
    let barrier = Barrier::new(callers);
    let admitted = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..callers {
            s.spawn(|| {
                barrier.wait();
                if c.try_admit() {
                    admitted.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(admitted.load(Ordering::SeqCst), 5);
    let stats = c.stats();
    assert_eq!(stats.requests_last_minute, 5);
    assert_eq!(stats.requests_last_hour, 5);
}

#[test]
fn shared_controller_across_repeated_rounds() {
    let clock = Arc::new(ManualClock::new(Duration::from_secs(1_000)));
    let c = Arc::new(AdmissionController::with_clock(
        AdmissionLimits { per_minute: 8, per_hour: 20 },
        clock.clone(),
    ));

    let mut total = 0;
    for _ in 0..4 {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let c = Arc::clone(&c);
                thread::spawn(move || c.try_admit())
            })
            .collect();
        total += handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        clock.advance(Duration::from_secs(61));
    }

    // 8 per round for the first two rounds, then the hour ceiling leaves 4.
    assert_eq!(total, 20);
    assert_eq!(c.stats().requests_last_hour, 20);
}
