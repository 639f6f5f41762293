//! Shared application state for the birdgate gateway.
//!
//! This is the composition root: the admission controller is built here from
//! config and handed to the middleware through `AppState`. Nothing is global.

use std::sync::Arc;

use birdgate_core::AdmissionController;

use crate::config::GatewayConfig;
use crate::obs::GatewayMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    admission: Arc<AdmissionController>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
}

impl AppState {
    /// Build state with a wall-clock controller from `cfg.admission`.
    pub fn new(cfg: GatewayConfig) -> Self {
        let admission = AdmissionController::new(cfg.admission.limits());
        Self::with_controller(cfg, admission)
    }

    /// Build state around an existing controller (tests inject a manual clock).
    pub fn with_controller(cfg: GatewayConfig, admission: AdmissionController) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            admission: Arc::new(admission),
            metrics: Arc::new(GatewayMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn admission(&self) -> Arc<AdmissionController> {
        Arc::clone(&self.admission)
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    /// Window occupancy gauges appended to `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        let s = self.admission.stats();
        vec![
            ("birdgate_admission_minute_window", s.requests_last_minute as u64),
            ("birdgate_admission_minute_limit", s.minute_limit as u64),
            ("birdgate_admission_hour_window", s.requests_last_hour as u64),
            ("birdgate_admission_hour_limit", s.hour_limit as u64),
        ]
    }
}
