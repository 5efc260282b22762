//! Gateway error types.

use thiserror::Error;

use crate::resilience::cascade::CascadeError;

/// Errors surfaced by gateway operations.
///
/// Only [`GatewayError::is_network_class`] errors are absorbed by the fallback
/// orchestrator; everything else reaches the caller unchanged.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request was cancelled by the gatekeeper before leaving the process.
    #[error("request cancelled: {reason}")]
    Cancelled { reason: String },

    /// Backend rejected the session credentials. Session has been torn down.
    #[error("session expired, sign in again")]
    Unauthorized,

    /// Backend answered with an error status that is not a degraded-network case.
    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Transport failure that does not fit a known degraded-network signature.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Every configured AI provider failed.
    #[error(transparent)]
    ProvidersExhausted(#[from] CascadeError),

    /// Invalid URL or path handed to the client.
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

impl GatewayError {
    /// Error kinds that indicate the backend is unreachable or degraded,
    /// as opposed to a genuine application error.
    pub fn is_network_class(&self) -> bool {
        match self {
            GatewayError::Cancelled { .. } => true,
            GatewayError::ProvidersExhausted(_) => true,
            GatewayError::Unauthorized
            | GatewayError::Status { .. }
            | GatewayError::Transport(_)
            | GatewayError::Decode(_)
            | GatewayError::Url(_) => false,
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            GatewayError::Cancelled { .. } => "cancelled",
            GatewayError::Unauthorized => "unauthorized",
            GatewayError::Status { .. } => "status",
            GatewayError::Transport(_) => "transport",
            GatewayError::Decode(_) => "decode",
            GatewayError::ProvidersExhausted(_) => "providers_exhausted",
            GatewayError::Url(_) => "url",
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_class() {
        assert!(GatewayError::Cancelled { reason: "backend unavailable".into() }.is_network_class());
        assert!(!GatewayError::Status { status: 422, message: String::new() }.is_network_class());
        assert!(!GatewayError::Transport("builder error".into()).is_network_class());
        assert!(!GatewayError::Unauthorized.is_network_class());

        let exhausted = CascadeError::Exhausted { providers: vec!["a".into(), "b".into()] };
        assert!(GatewayError::from(exhausted).is_network_class());
    }

    #[test]
    fn test_error_display() {
        let err = GatewayError::Status { status: 422, message: "job title required".into() };
        assert_eq!(err.to_string(), "backend returned status 422: job title required");

        let err = GatewayError::Cancelled { reason: "backend unavailable".into() };
        assert_eq!(err.to_string(), "request cancelled: backend unavailable");
    }
}
