//! Top-level facade crate for birdgate.
//!
//! Re-exports the admission core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use birdgate_core::*;
}

pub mod gateway {
    pub use birdgate_gateway::*;
}
