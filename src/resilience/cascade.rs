//! Ordered cascade over AI analysis providers.
//!
//! # Responsibilities
//! - Try providers strictly in declared order, each with its own timeout
//! - Stop at the first non-empty analysis
//! - Aggregate the names of every failed provider when all of them fail
//!
//! # Design Decisions
//! - No substitution here: exhaustion is an error the fallback orchestrator absorbs
//! - No backoff between attempts; the next provider is tried immediately
//! - Unauthorized aborts the cascade (the session is already gone)

use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::ProviderConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::http::client::ApiClient;
use crate::http::request::{join_path, ApiRequest, MultipartPayload};
use crate::observability::metrics;
use crate::services::types::{AnalysisRequest, ProviderReply};

/// Multipart field carrying the primary/fallback provider switch.
pub const PROVIDER_FLAG_FIELD: &str = "use_fallback_provider";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CascadeError {
    #[error("all analysis providers failed: {}", .providers.join(", "))]
    Exhausted { providers: Vec<String> },
}

/// One entry of the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttempt {
    pub name: String,
    pub path: String,
    pub timeout: Duration,
    pub use_fallback_provider: bool,
}

impl ProviderAttempt {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            name: config.name.clone(),
            path: config.path.clone(),
            timeout: config.timeout(),
            use_fallback_provider: config.use_fallback_provider,
        }
    }

    /// Absolute endpoint of this provider under `base`.
    pub fn endpoint(&self, base: &Url) -> Result<Url, url::ParseError> {
        join_path(base, &self.path)
    }

    /// Multipart body for this attempt.
    pub fn payload(&self, request: &AnalysisRequest) -> MultipartPayload {
        MultipartPayload::new()
            .file(
                "file",
                request.file_name.clone(),
                request.mime.clone(),
                request.file_bytes.clone(),
            )
            .text("job_title", request.job_title.clone())
            .text("job_description", request.job_description.clone())
            .text(PROVIDER_FLAG_FIELD, self.use_fallback_provider.to_string())
    }

    /// Full request for this attempt: endpoint, payload and timeout.
    pub fn request(&self, request: &AnalysisRequest) -> ApiRequest {
        ApiRequest::post(self.path.clone())
            .multipart(self.payload(request))
            .timeout(self.timeout)
    }
}

/// Successful cascade result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeSuccess {
    pub provider: String,
    pub reply: ProviderReply,
}

#[derive(Debug, Clone)]
pub struct ProviderCascade {
    client: ApiClient,
    attempts: Vec<ProviderAttempt>,
}

impl ProviderCascade {
    pub fn new(client: ApiClient, attempts: Vec<ProviderAttempt>) -> Self {
        Self { client, attempts }
    }

    pub fn from_config(client: ApiClient, providers: &[ProviderConfig]) -> Self {
        Self::new(client, providers.iter().map(ProviderAttempt::from_config).collect())
    }

    pub fn attempts(&self) -> &[ProviderAttempt] {
        &self.attempts
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> GatewayResult<CascadeSuccess> {
        let mut exhausted = Vec::with_capacity(self.attempts.len());

        for attempt in &self.attempts {
            tracing::debug!(provider = %attempt.name, timeout_ms = attempt.timeout.as_millis() as u64, "Trying analysis provider");

            match self.client.send_json::<ProviderReply>(attempt.request(request)).await {
                Ok(response) => match response.data {
                    Some(reply) if !reply.is_empty() => {
                        tracing::info!(provider = %attempt.name, "Analysis provider succeeded");
                        metrics::record_provider_attempt(&attempt.name, "success");
                        return Ok(CascadeSuccess {
                            provider: attempt.name.clone(),
                            reply,
                        });
                    }
                    Some(_) => {
                        tracing::warn!(provider = %attempt.name, "Analysis provider returned an empty analysis");
                        metrics::record_provider_attempt(&attempt.name, "empty");
                    }
                    None => {
                        tracing::warn!(
                            provider = %attempt.name,
                            status = response.status,
                            failure = ?response.failure,
                            "Analysis provider call failed"
                        );
                        metrics::record_provider_attempt(&attempt.name, "unavailable");
                    }
                },
                Err(GatewayError::Unauthorized) => {
                    metrics::record_provider_attempt(&attempt.name, "unauthorized");
                    return Err(GatewayError::Unauthorized);
                }
                Err(e) => {
                    tracing::warn!(provider = %attempt.name, error = %e, "Analysis provider call failed");
                    metrics::record_provider_attempt(&attempt.name, "error");
                }
            }

            exhausted.push(attempt.name.clone());
        }

        tracing::error!(providers = ?exhausted, "All analysis providers failed");
        Err(CascadeError::Exhausted { providers: exhausted }.into())
    }
}
