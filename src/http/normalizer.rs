//! Post-flight normalization of every gated call.
//!
//! # Responsibilities
//! - Classify failures (see `resilience::classifier`)
//! - Resolve Timeout / NetworkUnreachable / MethodNotAllowed to a sentinel response
//! - Tear the session down on Unauthorized
//! - Propagate everything else unchanged
//! - Open the circuit on NetworkUnreachable
//!
//! # Design Decisions
//! - Successful bodies are decoded as JSON; an empty body decodes to `null`

use reqwest::Response;

use crate::error::{GatewayError, GatewayResult};
use crate::health::AvailabilityState;
use crate::http::response::ApiResponse;
use crate::observability::metrics;
use crate::resilience::classifier::{classify, ErrorKind, TransportFailure};
use crate::session::Session;

/// Turn the outcome of `send()` into a normalized response.
pub async fn normalize(
    outcome: Result<Response, reqwest::Error>,
    state: &AvailabilityState,
    session: &Session,
) -> GatewayResult<ApiResponse> {
    match outcome {
        Ok(response) if response.status().is_success() => read_success(response, state, session).await,
        Ok(response) => {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            absorb(
                TransportFailure::Status(status.as_u16()),
                message,
                state,
                session,
            )
        }
        Err(e) => {
            let failure = TransportFailure::from(&e);
            absorb(failure, e.to_string(), state, session)
        }
    }
}

async fn read_success(
    response: Response,
    state: &AvailabilityState,
    session: &Session,
) -> GatewayResult<ApiResponse> {
    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or_default().to_string();
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(status = status.as_u16(), error = %e, "Failed to read response body");
            return absorb(TransportFailure::from(&e), e.to_string(), state, session);
        }
    };

    let data = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    metrics::record_request("ok");
    Ok(ApiResponse::ok(data, status.as_u16(), status_text))
}

/// Apply the per-kind policy to a classified failure.
pub fn absorb(
    failure: TransportFailure,
    message: String,
    state: &AvailabilityState,
    session: &Session,
) -> GatewayResult<ApiResponse> {
    let classified = classify(&failure);
    let status = failure.status().unwrap_or(0);

    tracing::debug!(
        kind = %classified.kind,
        status,
        retryable_as_mock = classified.retryable_as_mock,
        "Classified failed call"
    );

    match classified.kind {
        ErrorKind::Timeout | ErrorKind::MethodNotAllowed => {
            tracing::warn!(kind = %classified.kind, status, "Call failed, resolving to empty response");
            metrics::record_request("soft_failure");
            Ok(ApiResponse::unavailable(status, classified.kind))
        }
        ErrorKind::NetworkUnreachable => {
            tracing::warn!(error = %message, "Backend unreachable, resolving to empty response");
            state.mark_unavailable();
            metrics::record_request("soft_failure");
            Ok(ApiResponse::unavailable(status, classified.kind))
        }
        ErrorKind::Unauthorized => {
            metrics::record_request("unauthorized");
            session.expire();
            Err(GatewayError::Unauthorized)
        }
        ErrorKind::Other => {
            metrics::record_request("error");
            match failure {
                TransportFailure::Status(status) => Err(GatewayError::Status { status, message }),
                _ => Err(GatewayError::Transport(message)),
            }
        }
    }
}
