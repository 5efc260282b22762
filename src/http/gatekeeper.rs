//! Pre-flight gate for every backend call except the health probe.
//!
//! # Responsibilities
//! - Cancel the call before any socket is opened while the circuit is open
//! - Attach the session bearer token when one is held
//! - Tag the call with a request ID
//!
//! A missing token is not an error; unauthenticated calls still go out.

use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::health::AvailabilityState;
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;
use crate::session::Session;

/// Reason carried by gatekeeper cancellations.
pub const BACKEND_UNAVAILABLE: &str = "backend unavailable";

/// Admit or cancel an outbound call.
pub fn admit(
    state: &AvailabilityState,
    session: &Session,
    builder: RequestBuilder,
) -> GatewayResult<(RequestBuilder, Uuid)> {
    if !state.is_available() {
        metrics::record_request("cancelled");
        return Err(GatewayError::Cancelled {
            reason: BACKEND_UNAVAILABLE.to_string(),
        });
    }

    let request_id = Uuid::new_v4();
    let mut builder = builder.header(X_REQUEST_ID, request_id.to_string());
    if let Some(token) = session.token() {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    Ok((builder, request_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> RequestBuilder {
        reqwest::Client::new().get("http://127.0.0.1:9/api/resumes")
    }

    #[test]
    fn test_open_circuit_cancels() {
        let state = AvailabilityState::new();
        state.mark_unavailable();

        match admit(&state, &Session::default(), builder()) {
            Err(GatewayError::Cancelled { reason }) => assert_eq!(reason, BACKEND_UNAVAILABLE),
            other => panic!("expected cancellation, got {:?}", other.map(|(_, id)| id)),
        }
    }

    #[test]
    fn test_token_attached_when_present() {
        let state = AvailabilityState::new();
        let session = Session::default();
        session.sign_in("tok-1");

        let (builder, request_id) = admit(&state, &session, builder()).unwrap();
        let request = builder.build().unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok-1");
        assert_eq!(request.headers()[X_REQUEST_ID], request_id.to_string().as_str());
    }

    #[test]
    fn test_no_token_still_admitted() {
        let state = AvailabilityState::new();
        let (builder, _) = admit(&state, &Session::default(), builder()).unwrap();
        let request = builder.build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }
}
