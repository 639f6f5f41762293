//! birdgate core: admission control primitives, clock capability, and errors.
//!
//! This crate holds the dual sliding-window admission controller that sits in
//! front of every outbound call the gateway makes on behalf of its callers.
//! It carries no transport or runtime dependencies so it can be unit tested
//! with a manual clock and reused outside the HTTP host.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! The controller itself cannot fail; configuration mistakes surface as
//! `BirdgateError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod admission;
pub mod clock;
pub mod error;

pub use admission::{Admission, AdmissionController, AdmissionLimits, AdmissionStats, DenyReason};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{BirdgateError, Result};
