//! Policy layer (admission control at the HTTP edge).
//!
//! Translates admission decisions into HTTP outcomes. The counting itself
//! lives in `birdgate_core::admission`.

pub mod admission;

pub use admission::{admission_guard, retry_after_secs};
