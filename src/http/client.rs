//! Gated HTTP client for the career-services backend.
//!
//! Every call goes gatekeeper → reqwest → normalizer. The health probe does
//! not use this client.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::GatewayResult;
use crate::health::AvailabilityState;
use crate::http::gatekeeper;
use crate::http::normalizer;
use crate::http::request::{join_path, ApiRequest, RequestBody};
use crate::http::response::ApiResponse;
use crate::session::Session;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    default_timeout: Duration,
    state: Arc<AvailabilityState>,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(
        http: Client,
        base_url: Url,
        default_timeout: Duration,
        state: Arc<AvailabilityState>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            http,
            base_url,
            default_timeout,
            state,
            session,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn state(&self) -> &Arc<AvailabilityState> {
        &self.state
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Send a request and return the normalized response.
    pub async fn send(&self, request: ApiRequest) -> GatewayResult<ApiResponse> {
        let url = join_path(&self.base_url, &request.path)?;
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut builder = self.http.request(request.method.clone(), url).timeout(timeout);
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(payload) => builder.multipart(payload.into_form()?),
        };

        let (builder, request_id) = match gatekeeper::admit(&self.state, &self.session, builder) {
            Ok(admitted) => admitted,
            Err(e) => {
                tracing::debug!(method = %request.method, path = %request.path, "Request cancelled by gatekeeper");
                return Err(e);
            }
        };

        tracing::debug!(
            request_id = %request_id,
            method = %request.method,
            path = %request.path,
            timeout_ms = timeout.as_millis() as u64,
            "Sending request"
        );

        let outcome = builder.send().await;
        normalizer::normalize(outcome, &self.state, &self.session).await
    }

    /// Send a request and decode the payload into `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> GatewayResult<ApiResponse<T>> {
        self.send(request).await?.decode()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("default_timeout", &self.default_timeout)
            .field("available", &self.state.is_available())
            .finish()
    }
}
