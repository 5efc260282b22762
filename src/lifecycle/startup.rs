//! Client composition.
//!
//! # Responsibilities
//! - Validate configuration before anything is built
//! - Wire shared state, the gated HTTP client and the services in dependency order
//! - Run the start-up health probe when configured
//!
//! # Design Decisions
//! - Fail fast on invalid configuration or an unparsable base URL
//! - A corrupt flag file is logged and replaced, never fatal
//! - An unreachable backend at start-up is not an error (the circuit opens)

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, GatewayConfig};
use crate::health::{AvailabilityMonitor, AvailabilityState};
use crate::http::client::ApiClient;
use crate::observability::metrics;
use crate::resilience::{FallbackOrchestrator, FlagStore, ProviderCascade};
use crate::services::{CareerServices, RemoteCareerApi};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid backend base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fully wired gateway client.
pub struct GatewayClient {
    config: GatewayConfig,
    state: Arc<AvailabilityState>,
    session: Arc<Session>,
    api: ApiClient,
    monitor: Arc<AvailabilityMonitor>,
    flags: Arc<FlagStore>,
    remote: Arc<RemoteCareerApi>,
    services: CareerServices,
}

impl GatewayClient {
    pub async fn connect(config: GatewayConfig) -> Result<Self, StartupError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let base_url = Url::parse(&config.backend.base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("career-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let state = Arc::new(AvailabilityState::new());
        let session = Arc::new(Session::new(config.session.sign_in_path.clone()));
        let api = ApiClient::new(
            http.clone(),
            base_url.clone(),
            config.backend.request_timeout(),
            state.clone(),
            session.clone(),
        );
        let monitor = Arc::new(AvailabilityMonitor::new(
            state.clone(),
            http,
            base_url,
            config.health.clone(),
        ));

        let flags = Arc::new(open_flag_store(&config));
        let orchestrator = Arc::new(FallbackOrchestrator::new(flags.clone()).with_monitor(monitor.clone()));

        let cascade = ProviderCascade::from_config(api.clone(), &config.providers);
        let remote = Arc::new(RemoteCareerApi::new(
            api.clone(),
            cascade,
            orchestrator,
            generation_timeout(&config),
        ));
        let services = CareerServices::remote(remote.clone(), &config.features);

        tracing::info!(
            base_url = %config.backend.base_url,
            providers = config.providers.len(),
            skills = services.skills.is_some(),
            cover_letters = services.cover_letters.is_some(),
            "Gateway client initialized"
        );

        if config.health.probe_on_start {
            let available = monitor.check_availability().await;
            if !available {
                tracing::warn!("Backend unavailable at start-up, serving fallback data");
            }
        } else {
            metrics::record_backend_available(state.is_available());
        }

        Ok(Self {
            config,
            state,
            session,
            api,
            monitor,
            flags,
            remote,
            services,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn state(&self) -> &Arc<AvailabilityState> {
        &self.state
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn monitor(&self) -> &Arc<AvailabilityMonitor> {
        &self.monitor
    }

    pub fn flags(&self) -> &Arc<FlagStore> {
        &self.flags
    }

    pub fn remote(&self) -> &Arc<RemoteCareerApi> {
        &self.remote
    }

    pub fn services(&self) -> &CareerServices {
        &self.services
    }

    /// Re-probe the backend now.
    pub async fn check_availability(&self) -> bool {
        self.monitor.check_availability().await
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.config.backend.base_url)
            .field("available", &self.state.is_available())
            .field("session", &self.session)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

fn open_flag_store(config: &GatewayConfig) -> FlagStore {
    let ttl = config.fallback.cooldown();
    let Some(path) = &config.fallback.flag_path else {
        return FlagStore::new(ttl);
    };

    match FlagStore::load_from_file(path, ttl) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unreadable unavailability flag, starting cleared");
            FlagStore::new(ttl).persist_to(path.clone())
        }
    }
}

/// Timeout for AI-backed calls outside the cascade: the longest provider timeout.
fn generation_timeout(config: &GatewayConfig) -> Duration {
    config
        .providers
        .iter()
        .map(|p| p.timeout())
        .max()
        .unwrap_or_else(|| config.backend.request_timeout())
}
