//! birdgate gateway library entry.
//!
//! Wires config, the admission controller, the admission middleware, and the
//! ops endpoints into an axum stack. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
