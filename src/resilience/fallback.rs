//! Fallback orchestration for domain operations.
//!
//! # Algorithm
//! ```text
//! flag active?                      → mock(args)
//! flag just expired?                → clear, re-probe (if a monitor is attached)
//! real(args)
//!   Ok(sentinel | status >= 400)    → mock(args)
//!   Ok(data)                        → clear flag, data
//!   Err(network-class)              → set flag, mock(args)
//!   Err(other)                      → propagate
//! ```
//!
//! Callers get real data or a structurally identical substitute, and only
//! see errors that are not degraded-network failures.

use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

use crate::error::GatewayResult;
use crate::health::AvailabilityMonitor;
use crate::http::response::ApiResponse;
use crate::observability::metrics;
use crate::resilience::flag::{FlagState, FlagStore};

type RealOperation<A, T> =
    Box<dyn Fn(A) -> BoxFuture<'static, GatewayResult<ApiResponse<T>>> + Send + Sync>;

/// A remote operation paired with its deterministic substitute.
///
/// The mock is a plain function pointer, so it cannot capture state.
pub struct FallbackPolicy<A, T> {
    name: &'static str,
    real: RealOperation<A, T>,
    mock: fn(&A) -> T,
}

impl<A, T> FallbackPolicy<A, T> {
    pub fn new<F, Fut>(name: &'static str, real: F, mock: fn(&A) -> T) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = GatewayResult<ApiResponse<T>>> + Send + 'static,
    {
        Self {
            name,
            real: Box::new(move |args| real(args).boxed()),
            mock,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn mock(&self, args: &A) -> T {
        (self.mock)(args)
    }
}

impl<A, T> std::fmt::Debug for FallbackPolicy<A, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackPolicy").field("name", &self.name).finish()
    }
}

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Backend,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Cooldown flag was active; the real operation was skipped.
    FlagActive,
    /// The real operation resolved to an empty or error-status response.
    SoftFailure,
    /// The real operation failed with a network-class error.
    NetworkError,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::FlagActive => "flag_active",
            FallbackReason::SoftFailure => "soft_failure",
            FallbackReason::NetworkError => "network_error",
        }
    }
}

/// A value tagged with its source.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, DataSource::Fallback(_))
    }
}

pub struct FallbackOrchestrator {
    flags: Arc<FlagStore>,
    monitor: Option<Arc<AvailabilityMonitor>>,
}

impl FallbackOrchestrator {
    pub fn new(flags: Arc<FlagStore>) -> Self {
        Self { flags, monitor: None }
    }

    /// Re-probe the backend whenever the cooldown flag expires.
    pub fn with_monitor(mut self, monitor: Arc<AvailabilityMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn flags(&self) -> &Arc<FlagStore> {
        &self.flags
    }

    /// Run `policy`, returning only the value.
    pub async fn execute<A, T>(&self, policy: &FallbackPolicy<A, T>, args: A) -> GatewayResult<T>
    where
        A: Clone,
    {
        self.run(policy, args).await.map(|sourced| sourced.value)
    }

    /// Run `policy`, reporting whether the value is real or substituted.
    pub async fn run<A, T>(&self, policy: &FallbackPolicy<A, T>, args: A) -> GatewayResult<Sourced<T>>
    where
        A: Clone,
    {
        match self.flags.check() {
            FlagState::Active { remaining } => {
                tracing::debug!(
                    operation = policy.name,
                    remaining_ms = remaining.as_millis() as u64,
                    "Backend flagged unavailable, skipping real call"
                );
                return Ok(self.substitute(policy, &args, FallbackReason::FlagActive));
            }
            FlagState::Expired => {
                if let Some(monitor) = &self.monitor {
                    let available = monitor.check_availability().await;
                    tracing::info!(operation = policy.name, available, "Cooldown elapsed, backend re-probed");
                }
            }
            FlagState::Clear => {}
        }

        match (policy.real)(args.clone()).await {
            Ok(response) if response.is_soft_failure() => {
                tracing::warn!(
                    operation = policy.name,
                    status = response.status,
                    status_text = %response.status_text,
                    "Soft failure, substituting fallback data"
                );
                Ok(self.substitute(policy, &args, FallbackReason::SoftFailure))
            }
            Ok(response) => match response.data {
                Some(value) => {
                    self.flags.clear();
                    Ok(Sourced {
                        value,
                        source: DataSource::Backend,
                    })
                }
                None => Ok(self.substitute(policy, &args, FallbackReason::SoftFailure)),
            },
            Err(e) if e.is_network_class() => {
                tracing::warn!(operation = policy.name, kind = e.label(), error = %e, "Network-class failure, substituting fallback data");
                self.flags.set();
                Ok(self.substitute(policy, &args, FallbackReason::NetworkError))
            }
            Err(e) => {
                tracing::debug!(operation = policy.name, kind = e.label(), error = %e, "Propagating application error");
                Err(e)
            }
        }
    }

    fn substitute<A, T>(&self, policy: &FallbackPolicy<A, T>, args: &A, reason: FallbackReason) -> Sourced<T> {
        metrics::record_fallback(policy.name, reason.as_str());
        Sourced {
            value: policy.mock(args),
            source: DataSource::Fallback(reason),
        }
    }
}
