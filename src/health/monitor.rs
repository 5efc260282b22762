//! Availability probing.
//!
//! # Responsibilities
//! - Probe the backend health endpoint on demand
//! - Fall back to the alternate health path before declaring the backend down
//! - Update the shared circuit state with the result
//!
//! # Design Decisions
//! - Reactive, not polling: probes run at start-up and when asked
//! - At most one probe in flight; concurrent callers get the last known state
//! - The probe bypasses the gatekeeper (it must run while the circuit is open)

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::HealthConfig;
use crate::health::state::AvailabilityState;
use crate::http::request::join_path;

pub struct AvailabilityMonitor {
    state: Arc<AvailabilityState>,
    client: Client,
    base_url: Url,
    config: HealthConfig,
}

impl AvailabilityMonitor {
    pub fn new(state: Arc<AvailabilityState>, client: Client, base_url: Url, config: HealthConfig) -> Self {
        Self {
            state,
            client,
            base_url,
            config,
        }
    }

    pub fn state(&self) -> &Arc<AvailabilityState> {
        &self.state
    }

    /// Probe the backend and return whether it is available.
    ///
    /// Returns the last known state without probing when another probe is
    /// already running.
    pub async fn check_availability(&self) -> bool {
        let Some(_guard) = self.state.try_begin_probe() else {
            tracing::debug!("Probe already in flight, returning last known state");
            return self.state.is_available();
        };

        let timeout = self.config.timeout();
        let mut healthy = self.probe(&self.config.primary_path, timeout).await;
        if !healthy {
            tracing::debug!(
                path = %self.config.alternate_path,
                "Primary health probe failed, trying alternate path"
            );
            healthy = self.probe(&self.config.alternate_path, timeout).await;
        }

        self.state.set_available(healthy);
        healthy
    }

    async fn probe(&self, path: &str, timeout: Duration) -> bool {
        let url = match join_path(&self.base_url, path) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(path, error = %e, "Invalid health check path");
                return false;
            }
        };

        match self
            .client
            .get(url)
            .header("user-agent", "career-gateway-health-check")
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) if response.status().as_u16() == 200 => {
                tracing::debug!(path, "Health check passed");
                true
            }
            Ok(response) => {
                tracing::warn!(path, status = %response.status(), "Health check failed: non-200 status");
                false
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!(path, "Health check failed: timeout");
                false
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Health check failed: connection error");
                false
            }
        }
    }
}
