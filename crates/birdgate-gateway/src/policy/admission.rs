//! Admission middleware.
//!
//! Runs one `check()` per matched request on the guarded surface. Admitted
//! requests continue to the handler; denied ones get 429 with a `Retry-After`
//! hint and never reach it. Immediate rejection is the gateway's policy; the
//! controller itself only counts.

use std::time::Duration;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use birdgate_core::error::ClientCode;
use birdgate_core::{Admission, DenyReason};

use crate::app_state::AppState;

pub async fn admission_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match state.admission().check() {
        Admission::Admitted => {
            state
                .metrics()
                .admission_decisions
                .inc(&[("decision", "admitted")]);
            next.run(req).await
        }
        Admission::Denied { reason, retry_after } => {
            // Route template, never the raw URI: one series per route.
            let route = req
                .extensions()
                .get::<MatchedPath>()
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "unmatched".to_string());
            state
                .metrics()
                .admission_decisions
                .inc(&[("decision", "denied"), ("reason", reason.as_str())]);
            state.metrics().http_rejections.inc(&[("route", route.as_str())]);
            tracing::debug!(%route, path = req.uri().path(), reason = reason.as_str(), "request rejected by admission control");
            rate_limited(reason, retry_after)
        }
    }
}

/// Whole seconds for `Retry-After`, rounded up, never below 1.
pub fn retry_after_secs(d: Duration) -> u64 {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    secs.max(1)
}

fn rate_limited(reason: DenyReason, retry_after: Duration) -> Response {
    let secs = retry_after_secs(retry_after);
    let body = json!({
        "error": {
            "code": ClientCode::RateLimited.as_str(),
            "msg": format!("rate limit exceeded ({} window)", reason.as_str()),
            "retry_after_secs": secs
        }
    });
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, secs.to_string())],
        Json(body),
    )
        .into_response()
}
