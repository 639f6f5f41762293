//! Config schema: gateway listener and admission quotas, with validation.

use std::net::SocketAddr;

use serde::Deserialize;
use birdgate_core::error::{BirdgateError, Result};
use birdgate_core::AdmissionLimits;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub admission: AdmissionSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BirdgateError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.admission.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            BirdgateError::BadRequest(format!(
                "gateway.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

/// Quotas for outbound work, read once at startup.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdmissionSection {
    #[serde(default = "default_per_minute")]
    pub per_minute: u32,

    #[serde(default = "default_per_hour")]
    pub per_hour: u32,
}

impl Default for AdmissionSection {
    fn default() -> Self {
        Self {
            per_minute: default_per_minute(),
            per_hour: default_per_hour(),
        }
    }
}

impl AdmissionSection {
    pub fn validate(&self) -> Result<()> {
        if self.per_minute == 0 {
            return Err(BirdgateError::BadRequest(
                "admission.per_minute must be at least 1".into(),
            ));
        }
        if self.per_hour == 0 {
            return Err(BirdgateError::BadRequest(
                "admission.per_hour must be at least 1".into(),
            ));
        }
        if self.per_minute > self.per_hour {
            tracing::warn!(
                per_minute = self.per_minute,
                per_hour = self.per_hour,
                "admission.per_minute exceeds admission.per_hour; the hour window will bind first"
            );
        }
        Ok(())
    }

    pub fn limits(&self) -> AdmissionLimits {
        AdmissionLimits {
            per_minute: self.per_minute,
            per_hour: self.per_hour,
        }
    }
}

fn default_per_minute() -> u32 {
    AdmissionLimits::default().per_minute
}
fn default_per_hour() -> u32 {
    AdmissionLimits::default().per_hour
}
