//! Axum router wiring.
//!
//! Ops endpoints sit at the root. Everything under `/v1` is the guarded
//! surface: each matched request costs one admission.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, ops, policy};

pub fn build_router(state: AppState) -> Router {
    build_router_with(state, Router::new())
}

/// Like [`build_router`], with extra upstream routes mounted under `/v1`
/// behind admission control.
pub fn build_router_with(state: AppState, upstream: Router<AppState>) -> Router {
    let guarded = Router::new()
        .route("/admit", get(ops::admit))
        .merge(upstream)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            policy::admission_guard,
        ));

    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/stats", get(ops::stats))
        .route("/metrics", get(ops::metrics))
        .nest("/v1", guarded)
        .with_state(state)
}
