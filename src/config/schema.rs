//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway
//! client. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the gateway client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Backend location and default request timeout.
    pub backend: BackendConfig,

    /// Health probe settings.
    pub health: HealthConfig,

    /// Unavailability flag settings.
    pub fallback: FallbackConfig,

    /// Session settings.
    pub session: SessionConfig,

    /// AI analysis providers, tried in declared order.
    pub providers: Vec<ProviderConfig>,

    /// Optional capability areas.
    pub features: FeatureConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the career-services API (e.g., "http://localhost:8000").
    pub base_url: String,

    /// Timeout for ordinary calls in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Path probed first.
    pub primary_path: String,

    /// Path probed when the primary probe fails (routing-prefix variant).
    pub alternate_path: String,

    /// Probe timeout in milliseconds.
    pub timeout_ms: u64,

    /// Run a probe while the client is being built.
    pub probe_on_start: bool,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            primary_path: "/health-check".to_string(),
            alternate_path: "/api/health-check".to_string(),
            timeout_ms: 2_000,
            probe_on_start: true,
        }
    }
}

impl HealthConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Unavailability flag configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// How long a network-class failure keeps the flag set, in milliseconds.
    pub cooldown_ms: u64,

    /// File the flag is persisted to. In-memory only when absent.
    pub flag_path: Option<PathBuf>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 60_000,
            flag_path: None,
        }
    }
}

impl FallbackConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the user is sent when the backend rejects their credentials.
    pub sign_in_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sign_in_path: "/signin".to_string(),
        }
    }
}

/// A single AI analysis provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider identifier for logging/metrics.
    pub name: String,

    /// Endpoint path relative to the backend base URL.
    pub path: String,

    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,

    /// Value of the `use_fallback_provider` multipart field.
    #[serde(default)]
    pub use_fallback_provider: bool,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_provider_timeout_ms() -> u64 {
    45_000
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "deepseek".to_string(),
            path: "/api/resume/analyze".to_string(),
            timeout_ms: default_provider_timeout_ms(),
            use_fallback_provider: false,
        },
        ProviderConfig {
            name: "openai".to_string(),
            path: "/api/resume/analyze".to_string(),
            timeout_ms: default_provider_timeout_ms(),
            use_fallback_provider: true,
        },
    ]
}

/// Optional capability areas exposed by the backend deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub skills: bool,
    pub cover_letters: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            skills: true,
            cover_letters: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            health: HealthConfig::default(),
            fallback: FallbackConfig::default(),
            session: SessionConfig::default(),
            providers: default_providers(),
            features: FeatureConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Default configuration pointed at `base_url`.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.backend.base_url = base_url.into();
        config
    }
}
